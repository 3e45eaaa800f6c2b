pub mod grid;
pub mod shell;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::{
            collections::{BTreeMap, BTreeSet, HashMap, HashSet},
            ops::{Add, Sub}
        };
    }
}

pub mod prelude {
    pub use super::grid::prelude::*;
    pub use super::shell::*;
    pub use super::utils::prelude::*;
}
