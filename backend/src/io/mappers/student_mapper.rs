//! backend/src/io/mappers/student_mapper.rs

use crate::domain::models::{InstalledSoftware as DomainSoftware, Student as DomainStudent};
use shared::{
    InstalledSoftware as SharedSoftware, Student as SharedStudent, StudentListResponse,
    StudentResponse,
};

/// Mapper to convert between shared Student DTOs and domain Student models.
pub struct StudentMapper;

impl StudentMapper {
    /// Converts a shared Student DTO to a domain Student model.
    ///
    /// Empty strings in optional fields become `None`.
    pub fn to_domain(dto: SharedStudent) -> DomainStudent {
        DomainStudent {
            id: dto.id,
            name: dto.name,
            age: dto.age,
            department: dto.department,
            course: non_empty(dto.course),
            cadd_id: dto.cadd_id,
            pc_model: non_empty(dto.pc_model),
            image_url: non_empty(dto.image_url),
            installed_software: dto
                .installed_software
                .into_iter()
                .map(Self::software_to_domain)
                .collect(),
        }
    }

    /// Converts a domain Student model to a shared Student DTO.
    pub fn to_dto(domain: DomainStudent) -> SharedStudent {
        SharedStudent {
            id: domain.id,
            name: domain.name,
            age: domain.age,
            department: domain.department,
            course: domain.course,
            cadd_id: domain.cadd_id,
            pc_model: domain.pc_model,
            image_url: domain.image_url,
            installed_software: domain
                .installed_software
                .into_iter()
                .map(Self::software_to_dto)
                .collect(),
        }
    }

    fn software_to_domain(dto: SharedSoftware) -> DomainSoftware {
        DomainSoftware {
            name: dto.name,
            install_date: dto.install_date,
            image: non_empty(dto.image),
        }
    }

    fn software_to_dto(domain: DomainSoftware) -> SharedSoftware {
        SharedSoftware {
            name: domain.name,
            install_date: domain.install_date,
            image: domain.image,
        }
    }

    pub fn to_student_list_dto(domain_students: Vec<DomainStudent>) -> StudentListResponse {
        StudentListResponse {
            students: domain_students.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_student_response_dto(domain: Option<DomainStudent>) -> StudentResponse {
        StudentResponse {
            student: domain.map(Self::to_dto),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
