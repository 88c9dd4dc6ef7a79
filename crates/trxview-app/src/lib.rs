// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod filter;
pub mod model;
pub mod pagination;
pub mod state;
pub mod store;
pub mod view;

pub use filter::*;
pub use model::*;
pub use pagination::*;
pub use state::*;
pub use store::*;
pub use view::*;
