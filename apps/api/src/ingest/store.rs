//! In-memory resume store. Resumes are transient analysis inputs, not
//! durable records; the store exists so one upload can feed many analysis
//! runs within a process lifetime.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::ingest::parser::ParsedResume;
use crate::matching::vocabulary::SkillSet;

/// One stored resume with its extracted fields.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeDoc {
    pub id: Uuid,
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: SkillSet,
    #[serde(skip_serializing)]
    pub raw_text: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct ResumeStore {
    inner: RwLock<Vec<ResumeDoc>>,
}

impl ResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, filename: String, parsed: ParsedResume) -> ResumeDoc {
        let doc = ResumeDoc {
            id: Uuid::new_v4(),
            filename,
            name: parsed.name,
            email: parsed.email,
            phone: parsed.phone,
            skills: parsed.skills,
            raw_text: parsed.raw_text,
            uploaded_at: Utc::now(),
        };
        self.inner.write().await.push(doc.clone());
        doc
    }

    /// Snapshot of all stored resumes in upload order.
    pub async fn list(&self) -> Vec<ResumeDoc> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<ResumeDoc> {
        self.inner.read().await.iter().find(|d| d.id == id).cloned()
    }
}
