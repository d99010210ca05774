mod grid;
mod tables;

pub use self::grid::{print_mapping as print_mapping_grid, print_shares as print_share_heatmap};
pub use self::tables::{
    classification as print_classification_report, ngrams as print_ngram_report,
    outcome as print_outcome_report, partition as print_partition_report,
    reduced as print_reduced_report,
};
