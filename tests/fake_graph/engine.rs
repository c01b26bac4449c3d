//! Stub migration engine backed by two fake tenants
//!
//! A full job copies every message, event, contact and folder from the
//! source tenant into the destination tenant under fresh ids, which is
//! what a correct migration looks like from the outside. Knobs let a
//! test inject the failure modes the verifier has to catch.

use super::tenant::Tenant;
use async_trait::async_trait;
use mailbox_verify::{
    ErrorSeverity, JobId, MigrationEngine, MigrationRequest, MigrationStatus, ProjectItemError,
    QueueType, Result,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub struct CopyingEngine {
    source: Arc<Mutex<Tenant>>,
    destination: Arc<Mutex<Tenant>>,
    /// Subject of a message to leave behind.
    pub lose_mail: Option<String>,
    /// Display name of a contact to create twice.
    pub duplicate_contact: Option<String>,
    /// Status every job reports, overriding the queue-type default.
    pub forced_status: Option<MigrationStatus>,
    /// Errors every job reports.
    pub job_errors: Vec<ProjectItemError>,
    /// Statuses reported before the terminal one.
    pub pending_polls: usize,
    jobs: Mutex<HashMap<JobId, (QueueType, usize)>>,
    pub cleaned_up: AtomicBool,
}

/// The message a verification job reports for bad credentials.
pub const CREDENTIALS_ERROR: &str = "Your migration failed while checking source credentials. \
     Http POST request to 'autodiscover-s.outlook.com' failed - 401 ";

impl CopyingEngine {
    pub fn new(source: Arc<Mutex<Tenant>>, destination: Arc<Mutex<Tenant>>) -> Self {
        Self {
            source,
            destination,
            lose_mail: None,
            duplicate_contact: None,
            forced_status: None,
            job_errors: Vec::new(),
            pending_polls: 0,
            jobs: Mutex::new(HashMap::new()),
            cleaned_up: AtomicBool::new(false),
        }
    }

    fn copy(&self) {
        let source = self.source.lock().unwrap().clone();
        let mut destination = self.destination.lock().unwrap();

        for (id, name) in &source.folders {
            if destination.folder_name(id).is_none() {
                destination.folders.push((id.clone(), name.clone()));
            }
        }
        for message in source.messages {
            if self.lose_mail.as_deref() == message["subject"].as_str() {
                continue;
            }
            destination.push_message(message);
        }
        for event in source.events {
            destination.push_event(event);
        }
        for contact in source.contacts {
            let twice = self.duplicate_contact.as_deref() == contact["displayName"].as_str();
            if twice {
                destination.push_contact(contact.clone());
            }
            destination.push_contact(contact);
        }
    }
}

#[async_trait]
impl MigrationEngine for CopyingEngine {
    async fn submit_migration(&self, request: &MigrationRequest) -> Result<JobId> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = JobId(format!("job-{}", jobs.len() + 1));
        jobs.insert(job.clone(), (request.queue_type, 0));
        drop(jobs);

        if request.queue_type == QueueType::Full {
            self.copy();
        }
        Ok(job)
    }

    async fn status(&self, job: &JobId) -> Result<MigrationStatus> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some((queue_type, polls)) = jobs.get_mut(job) else {
            return Err(mailbox_verify::Error::Engine(format!("unknown job {job}")));
        };
        *polls += 1;
        if *polls <= self.pending_polls {
            return Ok(MigrationStatus::Processing);
        }
        Ok(self.forced_status.unwrap_or(match queue_type {
            QueueType::Full => MigrationStatus::Completed,
            QueueType::Verification => MigrationStatus::Failed,
        }))
    }

    async fn errors(&self, job: &JobId) -> Result<Vec<ProjectItemError>> {
        let queue_type = self.jobs.lock().unwrap().get(job).map(|(q, _)| *q);
        if queue_type == Some(QueueType::Verification) && self.job_errors.is_empty() {
            return Ok(vec![ProjectItemError {
                message: CREDENTIALS_ERROR.to_string(),
                severity: ErrorSeverity::Error,
            }]);
        }
        Ok(self.job_errors.clone())
    }

    async fn cleanup(&self) -> Result<()> {
        self.cleaned_up.store(true, Ordering::SeqCst);
        Ok(())
    }
}
