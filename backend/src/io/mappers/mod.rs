pub mod student_mapper;

pub use student_mapper::StudentMapper;
