use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use shared::Student as SharedStudent;

use super::connection::DbConnection;
use super::traits::{RecordStorage, StoredRoster};
use crate::domain::models::Student as DomainStudent;
use crate::io::mappers::StudentMapper;

/// Key the roster has always been stored under on devices
pub const DEFAULT_ROSTER_KEY: &str = "caddClubStudents";

/// Record store keeping the whole roster as one JSON value under one key
#[derive(Clone)]
pub struct RosterStore {
    connection: DbConnection,
    key: String,
}

impl RosterStore {
    pub fn new(connection: DbConnection, key: impl Into<String>) -> Self {
        Self {
            connection,
            key: key.into(),
        }
    }

    fn decode(raw: &str) -> Result<Vec<DomainStudent>> {
        let dtos: Vec<SharedStudent> =
            serde_json::from_str(raw).context("Stored roster is not a valid student list")?;
        Ok(dtos.into_iter().map(StudentMapper::to_domain).collect())
    }

    fn encode(roster: &[DomainStudent]) -> Result<String> {
        let dtos: Vec<SharedStudent> = roster.iter().cloned().map(StudentMapper::to_dto).collect();
        serde_json::to_string(&dtos).context("Failed to serialize roster")
    }
}

#[async_trait]
impl RecordStorage for RosterStore {
    async fn load(&self) -> StoredRoster {
        let raw = match self.connection.get_value(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No roster stored under '{}' yet", self.key);
                return StoredRoster::NeverSaved;
            }
            Err(e) => {
                warn!("Error loading roster from '{}': {:#}", self.key, e);
                return StoredRoster::Unreadable(e.to_string());
            }
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" {
            debug!("Roster under '{}' is blank", self.key);
            return StoredRoster::NeverSaved;
        }

        match Self::decode(trimmed) {
            Ok(students) => {
                info!("Loaded {} students from '{}'", students.len(), self.key);
                StoredRoster::Saved(students)
            }
            Err(e) => {
                warn!("Discarding unreadable roster under '{}': {:#}", self.key, e);
                StoredRoster::Unreadable(format!("{:#}", e))
            }
        }
    }

    async fn save(&self, roster: &[DomainStudent]) -> Result<()> {
        let json = Self::encode(roster)?;
        self.connection
            .put_value(&self.key, &json)
            .await
            .with_context(|| format!("Failed to write roster under '{}'", self.key))?;

        info!("Saved {} students under '{}'", roster.len(), self.key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let removed = self.connection.delete_value(&self.key).await?;
        debug!("Cleared roster key '{}' (existed: {})", self.key, removed);
        Ok(())
    }

    async fn close(&self) {
        self.connection.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::InstalledSoftware;
    use crate::storage::test_utils::TestEnvironment;

    fn sample_student(id: &str, name: &str) -> DomainStudent {
        DomainStudent {
            id: id.to_string(),
            name: name.to_string(),
            age: Some(21),
            department: "CADD".to_string(),
            course: Some("AutoCAD Advanced".to_string()),
            cadd_id: format!("CADD-{}", id),
            pc_model: None,
            image_url: None,
            installed_software: vec![InstalledSoftware {
                name: "AutoCAD 2024".to_string(),
                install_date: "01/15/2024".to_string(),
                image: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_load_before_any_save_is_never_saved() {
        let env = TestEnvironment::new().await.unwrap();
        let store = env.roster_store();

        assert_eq!(store.load().await, StoredRoster::NeverSaved);
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_order() {
        let env = TestEnvironment::new().await.unwrap();
        let store = env.roster_store();
        let roster = vec![sample_student("2", "Zara"), sample_student("1", "Amit")];

        store.save(&roster).await.expect("Failed to save roster");

        assert_eq!(store.load().await, StoredRoster::Saved(roster));
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_value() {
        let env = TestEnvironment::new().await.unwrap();
        let store = env.roster_store();

        store.save(&[sample_student("1", "Amit"), sample_student("2", "Zara")]).await.unwrap();
        store.save(&[sample_student("3", "Neha")]).await.unwrap();

        let students = store.load().await.into_students();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, "3");
        assert_eq!(env.connection.list_keys().await.unwrap(), vec![DEFAULT_ROSTER_KEY]);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_unreadable() {
        let env = TestEnvironment::new().await.unwrap();
        env.connection.put_value(DEFAULT_ROSTER_KEY, "{not json").await.unwrap();

        let loaded = env.roster_store().load().await;
        assert!(matches!(loaded, StoredRoster::Unreadable(_)));
        assert!(loaded.into_students().is_empty());
    }

    #[tokio::test]
    async fn test_blank_or_null_value_counts_as_never_saved() {
        let env = TestEnvironment::new().await.unwrap();
        let store = env.roster_store();

        for raw in ["", "  ", "null"] {
            env.connection.put_value(DEFAULT_ROSTER_KEY, raw).await.unwrap();
            assert!(store.load().await.is_never_saved());
        }
    }

    #[tokio::test]
    async fn test_reads_value_written_by_older_form_variant() {
        let env = TestEnvironment::new().await.unwrap();
        let legacy = r#"[{"id":"1","name":"Rahul Sharma","department":"CADD",
            "caddId":"CADD2024001","imageUrl":"",
            "installedSoftware":[{"name":"AutoCAD 2024","installDate":"2024-01-15"}]}]"#;
        env.connection.put_value(DEFAULT_ROSTER_KEY, legacy).await.unwrap();

        let students = env.roster_store().load().await.into_students();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].age, None);
        assert_eq!(students[0].image_url, None);
        assert_eq!(students[0].installed_software[0].install_date, "2024-01-15");
    }

    #[tokio::test]
    async fn test_clear_removes_value() {
        let env = TestEnvironment::new().await.unwrap();
        let store = env.roster_store();
        store.save(&[sample_student("1", "Amit")]).await.unwrap();

        store.clear().await.unwrap();

        assert!(store.load().await.is_never_saved());
    }

    #[tokio::test]
    async fn test_save_after_close_fails() {
        let env = TestEnvironment::new().await.unwrap();
        let store = env.roster_store();
        store.close().await;

        assert!(store.save(&[sample_student("1", "Amit")]).await.is_err());
        assert!(matches!(store.load().await, StoredRoster::Unreadable(_)));
    }
}
