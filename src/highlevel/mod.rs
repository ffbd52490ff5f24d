pub mod cbs_node;
pub mod cbs_tree;
pub mod conflict;
