//! Demo roster written on the very first run when seeding is enabled.

use super::models::{InstalledSoftware, Student};

fn software(name: &str, install_date: &str) -> InstalledSoftware {
    InstalledSoftware {
        name: name.to_string(),
        install_date: install_date.to_string(),
        image: None,
    }
}

pub fn demo_roster() -> Vec<Student> {
    vec![
        Student {
            id: "1".to_string(),
            name: "Rahul Sharma".to_string(),
            age: Some(21),
            department: "CADD".to_string(),
            course: Some("AutoCAD Advanced".to_string()),
            cadd_id: "CADD2024001".to_string(),
            pc_model: Some("Dell Optiplex 7090".to_string()),
            image_url: None,
            installed_software: vec![
                software("AutoCAD 2024", "2024-01-15"),
                software("SolidWorks 2023", "2024-02-10"),
            ],
        },
        Student {
            id: "2".to_string(),
            name: "Priya Patel".to_string(),
            age: Some(20),
            department: "SYNERGY".to_string(),
            course: Some("SolidWorks Fundamentals".to_string()),
            cadd_id: "CADD2024002".to_string(),
            pc_model: Some("HP EliteDesk 800".to_string()),
            image_url: None,
            installed_software: vec![
                software("SolidWorks 2023", "2024-01-20"),
                software("CATIA V5", "2024-03-05"),
            ],
        },
    ]
}
