pub mod student;

pub use student::{IdGenerator, InstalledSoftware, Student};
