//! Test fixture loader for Wayfinder seed catalogs and integration scenarios.
//!
//! Provides typed deserialization of the fixture JSON files and helpers for
//! loading them into a repository in tests across crates.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use wayfinder_core::entity::{EntityId, EntityRecord, Organization, Program};
use wayfinder_core::errors::WayfinderResult;
use wayfinder_core::traits::IEntityRepository;

/// Root directory of the fixture data.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// An organization together with the programs it offers. Program entries
/// omit `organization_id`; it is assigned when the catalog is seeded.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedOrganization {
    #[serde(flatten)]
    pub organization: Organization,
    #[serde(default)]
    pub programs: Vec<SeedProgram>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProgram {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub degree_type: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub tuition_fee: Option<String>,
    #[serde(default)]
    pub language_of_study: Option<String>,
}

impl SeedProgram {
    pub fn into_program(self, organization_id: EntityId) -> Program {
        Program {
            description: self.description,
            degree_type: self.degree_type,
            field_of_study: self.field_of_study,
            duration: self.duration,
            tuition_fee: self.tuition_fee,
            language_of_study: self.language_of_study,
            ..Program::new(organization_id, self.name)
        }
    }
}

/// The catalog fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCatalog {
    pub organizations: Vec<SeedOrganization>,
}

/// Ids assigned while seeding, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct SeededIds {
    pub organizations: Vec<EntityId>,
    pub programs: Vec<EntityId>,
}

/// Load `catalog.json`.
pub fn load_catalog() -> SeedCatalog {
    load_fixture("catalog.json")
}

/// Upsert every organization and program of `catalog` into `repo`.
pub fn seed_catalog(
    repo: &dyn IEntityRepository,
    catalog: &SeedCatalog,
) -> WayfinderResult<SeededIds> {
    let mut ids = SeededIds::default();
    for seed in &catalog.organizations {
        let org_id = repo.upsert(&EntityRecord::Organization(seed.organization.clone()))?;
        ids.organizations.push(org_id);
        for program in &seed.programs {
            let record = EntityRecord::Program(program.clone().into_program(org_id));
            ids.programs.push(repo.upsert(&record)?);
        }
    }
    Ok(ids)
}

/// Unit vector along `axis` in `dims` dimensions.
pub fn axis_vector(dims: usize, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dims];
    if axis < dims {
        v[axis] = 1.0;
    }
    v
}
