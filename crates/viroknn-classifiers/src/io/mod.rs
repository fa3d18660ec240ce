pub mod feature_table;

pub use feature_table::{read_feature_table, table_delimiter, FeatureTable};
