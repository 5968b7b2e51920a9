//! Grouping of database objects into generation units

use crate::model::{Database, DbObject, DbObjectKind, Table, View};

/// All tables and views of one schema; scaffolded into one controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFeature {
    /// Schema name
    pub name: String,
    pub db_objects: Vec<DbObject>,
}

impl ProjectFeature {
    pub fn tables<'a>(&self, database: &'a Database) -> Vec<&'a Table> {
        self.db_objects
            .iter()
            .filter(|o| o.kind == DbObjectKind::Table)
            .filter_map(|o| database.find_table(&o.full_name()))
            .collect()
    }

    pub fn views<'a>(&self, database: &'a Database) -> Vec<&'a View> {
        self.db_objects
            .iter()
            .filter(|o| o.kind == DbObjectKind::View)
            .filter_map(|o| database.find_view(&o.schema, &o.name))
            .collect()
    }
}

/// One feature per schema that owns at least one table or view, in order of
/// first appearance (tables before views).
pub fn build_features(database: &Database) -> Vec<ProjectFeature> {
    let mut features: Vec<ProjectFeature> = Vec::new();

    for object in database.db_objects() {
        match features.iter_mut().find(|f| f.name == object.schema) {
            Some(feature) => feature.db_objects.push(object),
            None => features.push(ProjectFeature {
                name: object.schema.clone(),
                db_objects: vec![object],
            }),
        }
    }

    features
}
