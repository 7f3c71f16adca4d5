//! Tantivy schema definition for directory search.
//!
//! One document per periodical issue with four searchable fields:
//! title, articles text, tags and category name.

use serde::{Deserialize, Serialize};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING,
};

use crate::SearchError;

/// Tokenizer used for every searchable field (lowercase + English stemming).
pub const TEXT_TOKENIZER: &str = "en_stem";

/// A searchable field of an index record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchField {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "articlesText")]
    ArticlesText,
    #[serde(rename = "tags")]
    Tags,
    #[serde(rename = "category")]
    Category,
}

impl MatchField {
    /// Every searchable field, in schema order.
    pub const ALL: [MatchField; 4] = [
        MatchField::Title,
        MatchField::ArticlesText,
        MatchField::Tags,
        MatchField::Category,
    ];

    /// Name reported in match results.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::ArticlesText => "articlesText",
            MatchField::Tags => "tags",
            MatchField::Category => "category",
        }
    }

    /// Name of the field in the Tantivy schema.
    pub fn schema_name(&self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::ArticlesText => "articles_text",
            MatchField::Tags => "tags",
            MatchField::Category => "category",
        }
    }

    /// Parse from the result name, returning None for unknown fields.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl std::fmt::Display for MatchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown match field: {}", s))
    }
}

/// Schema field handles for efficient access
#[derive(Debug, Clone)]
pub struct SearchSchema {
    schema: Schema,
    /// Primary key: document node id (STRING | STORED)
    pub doc_id: Field,
    /// Issue title (TEXT)
    pub title: Field,
    /// Article titles joined with spaces (TEXT)
    pub articles_text: Field,
    /// Tags joined with spaces (TEXT)
    pub tags: Field,
    /// Parent category display name (TEXT)
    pub category: Field,
}

impl SearchSchema {
    /// Get the underlying Tantivy schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Field handle for a searchable field.
    pub fn field(&self, field: MatchField) -> Field {
        match field {
            MatchField::Title => self.title,
            MatchField::ArticlesText => self.articles_text,
            MatchField::Tags => self.tags,
            MatchField::Category => self.category,
        }
    }

    /// Searchable field behind a handle; None for `doc_id` or foreign fields.
    pub fn match_field(&self, field: Field) -> Option<MatchField> {
        MatchField::ALL.into_iter().find(|f| self.field(*f) == field)
    }

    /// All searchable field handles.
    pub fn text_fields(&self) -> Vec<Field> {
        MatchField::ALL.iter().map(|f| self.field(*f)).collect()
    }

    /// Create a SearchSchema from an existing Tantivy Schema
    pub fn from_schema(schema: Schema) -> Result<Self, SearchError> {
        let lookup = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| SearchError::SchemaMismatch(format!("missing {} field", name)))
        };

        let doc_id = lookup("doc_id")?;
        let title = lookup(MatchField::Title.schema_name())?;
        let articles_text = lookup(MatchField::ArticlesText.schema_name())?;
        let tags = lookup(MatchField::Tags.schema_name())?;
        let category = lookup(MatchField::Category.schema_name())?;

        Ok(Self {
            schema,
            doc_id,
            title,
            articles_text,
            tags,
            category,
        })
    }
}

/// Build the directory search schema.
///
/// Schema fields:
/// - doc_id: STRING | STORED - document node id
/// - title, articles_text, tags, category: TEXT with positions, stemmed
pub fn build_directory_schema() -> SearchSchema {
    let mut schema_builder = Schema::builder();

    let doc_id = schema_builder.add_text_field("doc_id", STRING | STORED);

    // Positions are kept so multi-token terms become phrase queries
    let indexing = TextFieldIndexing::default()
        .set_tokenizer(TEXT_TOKENIZER)
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    let text = TextOptions::default().set_indexing_options(indexing);

    let title = schema_builder.add_text_field(MatchField::Title.schema_name(), text.clone());
    let articles_text =
        schema_builder.add_text_field(MatchField::ArticlesText.schema_name(), text.clone());
    let tags = schema_builder.add_text_field(MatchField::Tags.schema_name(), text.clone());
    let category = schema_builder.add_text_field(MatchField::Category.schema_name(), text);

    let schema = schema_builder.build();

    SearchSchema {
        schema,
        doc_id,
        title,
        articles_text,
        tags,
        category,
    }
}
