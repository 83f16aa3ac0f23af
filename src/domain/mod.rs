// Domain layer - catalogs and core value types

pub mod catalog;
pub mod model;
