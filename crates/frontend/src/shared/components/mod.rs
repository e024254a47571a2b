pub mod pagination_controls;
pub mod wip_grid;
