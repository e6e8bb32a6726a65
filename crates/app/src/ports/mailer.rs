//! Mailer port — best-effort notification transport.

use std::future::Future;

use taskhub_domain::error::TaskHubError;

/// An outbound notification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub recipient: String,
    /// HTML body.
    pub body: String,
}

impl Email {
    /// Notification sent when a task is assigned or created.
    #[must_use]
    pub fn task_assigned(
        recipient: impl Into<String>,
        project_name: &str,
        task_title: &str,
        assigned_by: &str,
    ) -> Self {
        Self {
            subject: format!("New Task Assigned in {project_name}"),
            recipient: recipient.into(),
            body: format!(
                "<h3>New Task Assigned</h3>\
                 <p><b>Task:</b> {task_title}</p>\
                 <p><b>Project:</b> {project_name}</p>\
                 <p><b>Assigned By:</b> {assigned_by}</p>\
                 <br><p>Login to your dashboard to view details.</p>"
            ),
        }
    }

    /// Notification sent when a task's status changes.
    #[must_use]
    pub fn task_status_updated(
        recipient: impl Into<String>,
        project_name: &str,
        task_title: &str,
        new_status: &str,
        updated_by: &str,
    ) -> Self {
        Self {
            subject: format!("Task Status Updated in {project_name}"),
            recipient: recipient.into(),
            body: format!(
                "<h3>Task Status Updated</h3>\
                 <p><b>Task:</b> {task_title}</p>\
                 <p><b>New Status:</b> {new_status}</p>\
                 <p><b>Updated By:</b> {updated_by}</p>\
                 <br><p>Login to your dashboard for details.</p>"
            ),
        }
    }
}

/// Delivers a single email. Failures are logged by the caller and never
/// reach the request path.
pub trait Mailer {
    fn send(&self, email: &Email) -> impl Future<Output = Result<(), TaskHubError>> + Send;
}
