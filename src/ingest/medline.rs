use std::path::Path;
use std::sync::Arc;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::AttributeType;
use crate::ingest::job::{IngestJob, IngestReport};
use crate::schema::schema::{Attribute, Schema};
use crate::storage::layout::StorageLayout;
use crate::storage::tuple_log::TupleLogWriter;

pub const PMID: &str = "pmid";
pub const AFFILIATION: &str = "affiliation";
pub const ARTICLE_TITLE: &str = "article_title";
pub const AUTHORS: &str = "authors";
pub const JOURNAL_ISSUE: &str = "journal_issue";
pub const JOURNAL_TITLE: &str = "journal_title";
pub const KEYWORDS: &str = "keywords";
pub const MESH_HEADINGS: &str = "mesh_headings";
pub const ABSTRACT: &str = "abstract";
pub const ZIPF_SCORE: &str = "zipf_score";

pub fn medline_attributes() -> Vec<Attribute> {
    vec![
        Attribute::new(PMID, AttributeType::Integer),
        Attribute::new(AFFILIATION, AttributeType::Text),
        Attribute::new(ARTICLE_TITLE, AttributeType::Text),
        Attribute::new(AUTHORS, AttributeType::Text),
        Attribute::new(JOURNAL_ISSUE, AttributeType::String),
        Attribute::new(JOURNAL_TITLE, AttributeType::Text),
        Attribute::new(KEYWORDS, AttributeType::Text),
        Attribute::new(MESH_HEADINGS, AttributeType::Text),
        Attribute::new(ABSTRACT, AttributeType::Text),
        Attribute::new(ZIPF_SCORE, AttributeType::Double),
    ]
}

pub fn medline_schema() -> Result<Arc<Schema>> {
    Ok(Arc::new(Schema::new(medline_attributes())?))
}

/// Load a Medline JSON-lines file into the tuple log of `table`
pub fn write_medline_table(path: impl AsRef<Path>, table: &str, config: &Config) -> Result<IngestReport> {
    let schema = medline_schema()?;
    let layout = Arc::new(StorageLayout::new(config.storage_path.clone())?);
    let mut writer = TupleLogWriter::new(layout, table, Arc::clone(&schema), config.sync_mode);

    IngestJob::new(schema, config.clone()).ingest_file(path, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Field;
    use crate::storage::tuple_log::TupleLogReader;
    use std::fs;
    use tempfile::TempDir;

    const ARTICLE: &str = r#"{"pmid":"17","affiliation":"UC Irvine","article_title":"On cancer","authors":"A. B.","journal_issue":"2016 Nov","journal_title":"Onc","keywords":"tumor","mesh_headings":"Neoplasms","abstract":"Cancer study.","zipf_score":0.42}"#;

    #[test]
    fn schema_has_ten_attributes_in_order() {
        let schema = medline_schema().unwrap();
        assert_eq!(schema.attribute_count(), 10);
        assert_eq!(schema.index_of(PMID), Some(0));
        assert_eq!(schema.index_of(ZIPF_SCORE), Some(9));
        assert_eq!(schema.attribute_by_name(JOURNAL_ISSUE).unwrap().attribute_type(), AttributeType::String);
    }

    #[test]
    fn loads_file_into_table() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("medline.json");
        fs::write(&input, format!("{}\n{}\n", ARTICLE, ARTICLE.replace("\"17\"", "\"18\""))).unwrap();

        let config = Config::default().with_storage_path(dir.path().join("data"));
        let report = write_medline_table(&input, "medline", &config).unwrap();
        assert_eq!(report.records, 2);

        let layout = StorageLayout::new(config.storage_path.clone()).unwrap();
        let tuples = TupleLogReader::open(&layout, "medline").unwrap().read_all().unwrap();
        assert_eq!(tuples[1].field_by_name(PMID), Some(&Field::Integer(18)));
        assert_eq!(tuples[0].field_by_name(ZIPF_SCORE), Some(&Field::Double(0.42)));
    }
}
