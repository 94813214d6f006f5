pub mod test_dropout;
pub mod test_layers;
pub mod test_reporting;
pub mod test_tree;
