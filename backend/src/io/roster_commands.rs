//! Commands the screens call.
//!
//! Each command takes the shared `AppState`, works in domain types, and hands
//! back `shared` DTOs. Errors come back as user-presentable strings; a failed
//! write to device storage is not an error here but a `persisted: false`
//! response carrying a warning, because the roster in memory already changed.

use log::info;
use shared::{
    DeleteStudentRequest, DeleteStudentResponse, SaveStudentRequest, SaveStudentResponse,
    SearchStudentsRequest, SearchStudentsResponse, StudentDetailView, StudentFormData,
    StudentListResponse, StudentResponse,
};

use super::mappers::StudentMapper;
use crate::domain::{StudentFormService, STUDENT_ADDED_MESSAGE, STUDENT_UPDATED_MESSAGE};
use crate::AppState;

pub async fn get_student_list(app_state: &AppState) -> Result<StudentListResponse, String> {
    let students = app_state.student_repository.list();
    info!("Listing {} students", students.len());
    Ok(StudentMapper::to_student_list_dto(students))
}

pub async fn get_student(
    app_state: &AppState,
    student_id: &str,
) -> Result<StudentResponse, String> {
    let student = app_state.student_repository.find_by_id(student_id);
    if student.is_none() {
        info!("No student with id {}", student_id);
    }
    Ok(StudentMapper::to_student_response_dto(student))
}

pub async fn get_student_detail(
    app_state: &AppState,
    student_id: &str,
) -> Result<Option<StudentDetailView>, String> {
    Ok(app_state
        .student_repository
        .find_by_id(student_id)
        .map(|student| app_state.student_details_service.describe(&student)))
}

pub async fn search_students(
    app_state: &AppState,
    request: SearchStudentsRequest,
) -> Result<SearchStudentsResponse, String> {
    let students = app_state.student_repository.filter(&request.query);
    Ok(SearchStudentsResponse {
        query: request.query,
        students: students.into_iter().map(StudentMapper::to_dto).collect(),
    })
}

pub async fn get_department_options(app_state: &AppState) -> Result<Vec<String>, String> {
    Ok(app_state.student_form_service.department_options().to_vec())
}

/// The form to show for adding (`None`) or editing (`Some(id)`) a student
pub async fn get_student_form(
    app_state: &AppState,
    student_id: Option<&str>,
) -> Result<StudentFormData, String> {
    match student_id {
        None => Ok(StudentFormService::create_form()),
        Some(id) => app_state
            .student_repository
            .require(id)
            .map(|student| StudentFormService::edit_form_from_student(&student))
            .map_err(|e| e.to_string()),
    }
}

pub async fn save_student(
    app_state: &AppState,
    request: SaveStudentRequest,
) -> Result<SaveStudentResponse, String> {
    let existing_id = match request.student_id.as_deref() {
        Some(id) => Some(
            app_state
                .student_repository
                .require(id)
                .map_err(|e| e.to_string())?
                .id,
        ),
        None => None,
    };

    let student = app_state
        .student_form_service
        .build_student(&request.form, existing_id.as_deref())
        .map_err(|e| e.to_string())?;

    let outcome = app_state.student_repository.upsert(student.clone()).await;
    let success_message = if existing_id.is_some() {
        STUDENT_UPDATED_MESSAGE
    } else {
        STUDENT_ADDED_MESSAGE
    };

    Ok(SaveStudentResponse {
        student: StudentMapper::to_dto(student),
        roster_size: outcome.roster.len(),
        persisted: outcome.is_persisted(),
        warning: outcome.warning(),
        success_message: success_message.to_string(),
    })
}

pub async fn delete_student(
    app_state: &AppState,
    request: DeleteStudentRequest,
) -> Result<DeleteStudentResponse, String> {
    let outcome = app_state.student_repository.remove(&request.student_id).await;

    Ok(DeleteStudentResponse {
        deleted: outcome.changed,
        remaining: outcome.roster.len(),
        persisted: outcome.is_persisted(),
        warning: outcome.warning(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterConfig;
    use crate::storage::test_utils::FlakyRecordStorage;
    use crate::initialize_backend_with_store;
    use std::sync::Arc;

    fn form(name: &str, cadd_id: &str) -> StudentFormData {
        let mut form = StudentFormService::create_form();
        form.name = name.to_string();
        form.department = "CADD".to_string();
        form.cadd_id = cadd_id.to_string();
        form.installed_software[0].name = "AutoCAD 2024".to_string();
        form
    }

    async fn setup() -> (AppState, Arc<FlakyRecordStorage>) {
        let config = RosterConfig {
            seed_demo_roster: false,
            ..RosterConfig::default()
        };
        let storage = Arc::new(FlakyRecordStorage::new());
        let app_state = initialize_backend_with_store(config, storage.clone()).await;
        (app_state, storage)
    }

    #[tokio::test]
    async fn test_default_config_seeds_first_run() {
        let storage = Arc::new(FlakyRecordStorage::new());
        let app_state =
            initialize_backend_with_store(RosterConfig::default(), storage.clone()).await;

        let names: Vec<String> = get_student_list(&app_state)
            .await
            .unwrap()
            .students
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Rahul Sharma", "Priya Patel"]);
        assert_eq!(storage.save_count(), 1);
    }

    #[tokio::test]
    async fn test_new_ids_never_collide_with_stored_ids() {
        let far_future_id = "9999999999999";
        let mut stored = crate::domain::seed::demo_roster();
        stored[0].id = far_future_id.to_string();
        let storage = Arc::new(FlakyRecordStorage::with_roster(stored));
        let app_state = initialize_backend_with_store(RosterConfig::default(), storage).await;

        let created = save_student(
            &app_state,
            SaveStudentRequest { student_id: None, form: form("Neha Gupta", "CADD2024003") },
        )
        .await
        .unwrap();

        assert_eq!(created.student.id, "10000000000000");
        assert_eq!(created.roster_size, 3);
        let kept = get_student(&app_state, far_future_id).await.unwrap().student.unwrap();
        assert_eq!(kept.name, "Rahul Sharma");
    }

    #[tokio::test]
    async fn test_save_new_then_edit() {
        let (app_state, _) = setup().await;

        let created = save_student(
            &app_state,
            SaveStudentRequest { student_id: None, form: form("Rahul Sharma", "CADD2024001") },
        )
        .await
        .unwrap();
        assert_eq!(created.success_message, "Student added successfully!");
        assert!(created.persisted);
        assert_eq!(created.roster_size, 1);

        let mut edit_form = get_student_form(&app_state, Some(created.student.id.as_str()))
            .await
            .unwrap();
        edit_form.name = "Rahul S.".to_string();
        let updated = save_student(
            &app_state,
            SaveStudentRequest { student_id: Some(created.student.id.clone()), form: edit_form },
        )
        .await
        .unwrap();

        assert_eq!(updated.student.id, created.student.id);
        assert_eq!(updated.roster_size, 1);
        assert_eq!(updated.success_message, "Student updated successfully!");
    }

    #[tokio::test]
    async fn test_invalid_form_is_rejected_and_roster_unchanged() {
        let (app_state, storage) = setup().await;

        let result = save_student(
            &app_state,
            SaveStudentRequest { student_id: None, form: form("", "X1") },
        )
        .await;

        let message = result.unwrap_err();
        assert!(message.starts_with("Please fill in all required fields."));
        assert!(get_student_list(&app_state).await.unwrap().students.is_empty());
        assert_eq!(storage.save_count(), 0);
    }

    #[tokio::test]
    async fn test_editing_unknown_student_fails() {
        let (app_state, _) = setup().await;

        let result = save_student(
            &app_state,
            SaveStudentRequest { student_id: Some("404".to_string()), form: form("A", "B") },
        )
        .await;
        assert_eq!(result.unwrap_err(), "Student not found: 404");
        assert!(get_student_form(&app_state, Some("404")).await.is_err());
    }

    #[tokio::test]
    async fn test_storage_failure_is_a_warning_not_an_error() {
        let (app_state, storage) = setup().await;
        storage.set_fail_saves(true);

        let response = save_student(
            &app_state,
            SaveStudentRequest { student_id: None, form: form("Priya Patel", "CADD2024002") },
        )
        .await
        .unwrap();

        assert!(!response.persisted);
        assert!(response.warning.is_some());
        assert_eq!(get_student_list(&app_state).await.unwrap().students.len(), 1);
    }

    #[tokio::test]
    async fn test_search_get_detail_and_delete() {
        let (app_state, _) = setup().await;
        let saved = save_student(
            &app_state,
            SaveStudentRequest { student_id: None, form: form("Rahul Sharma", "CADD2024001") },
        )
        .await
        .unwrap();
        let id = saved.student.id;

        let request = SearchStudentsRequest { query: "AUTOCAD".to_string() };
        let found = search_students(&app_state, request).await.unwrap();
        assert_eq!(found.students.len(), 1);

        let detail = get_student_detail(&app_state, &id).await.unwrap().unwrap();
        assert_eq!(detail.age_label, "Not specified");
        let fetched = get_student(&app_state, &id).await.unwrap().student.unwrap();
        assert_eq!(fetched.name, "Rahul Sharma");

        let deleted = delete_student(&app_state, DeleteStudentRequest { student_id: id.clone() })
            .await
            .unwrap();
        assert!(deleted.deleted);
        assert_eq!(deleted.remaining, 0);
        assert!(get_student(&app_state, &id).await.unwrap().student.is_none());

        let again = delete_student(&app_state, DeleteStudentRequest { student_id: id })
            .await
            .unwrap();
        assert!(!again.deleted);
    }

    #[tokio::test]
    async fn test_department_options_and_blank_form() {
        let (app_state, _) = setup().await;

        let options = get_department_options(&app_state).await.unwrap();
        assert_eq!(options, vec!["CADD", "LIVE WIRE", "DREAM ZONE", "SYNERGY"]);

        let blank = get_student_form(&app_state, None).await.unwrap();
        assert_eq!(blank.installed_software.len(), 1);
    }
}
