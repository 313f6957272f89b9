/// Role-scoped aggregation and defensive filtering
///
/// Dashboards and analytics never aggregate raw task lists directly:
/// tasks whose parent project no longer exists are dropped first
/// ([`valid_tasks`]). Project deletion cascades transactionally, so in
/// normal operation nothing is dropped - the filter guards against the
/// invariant being violated by partial failures.
///
/// All helpers here are pure; the route layer picks which rows to feed
/// them based on the actor's role.
use std::collections::HashSet;

use serde::Serialize;

use crate::models::project::Project;
use crate::models::task::{Task, TaskStatus};
use crate::models::user::{Role, User};

/// A named count bucket, the chart-friendly shape the analytics view uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// Bucket label
    pub name: String,

    /// Number of items in the bucket
    pub value: usize,
}

/// Per-user resolved/open task breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserTaskBreakdown {
    /// Username
    pub name: String,

    /// Tasks resolved or closed
    pub resolved: usize,

    /// Everything else
    pub open: usize,
}

/// Drops tasks whose parent project is not in `projects`
pub fn valid_tasks(tasks: Vec<Task>, projects: &[Project]) -> Vec<Task> {
    let project_ids: HashSet<_> = projects.iter().map(|p| p.id).collect();

    tasks
        .into_iter()
        .filter(|t| project_ids.contains(&t.project_id))
        .collect()
}

/// Counts projects by active/inactive
pub fn projects_by_status(projects: &[Project]) -> Vec<StatusCount> {
    let active = projects.iter().filter(|p| p.is_active).count();

    vec![
        StatusCount {
            name: "Active".to_string(),
            value: active,
        },
        StatusCount {
            name: "Inactive".to_string(),
            value: projects.len() - active,
        },
    ]
}

/// Counts tasks per workflow status
///
/// Every status appears exactly once, zero counts included.
pub fn tasks_by_status(tasks: &[Task]) -> Vec<StatusCount> {
    TaskStatus::ALL
        .iter()
        .map(|status| StatusCount {
            name: status.as_str().to_string(),
            value: tasks.iter().filter(|t| t.status == *status).count(),
        })
        .collect()
}

/// Per-user resolved-vs-open breakdown over all non-admin users
///
/// Resolved and closed tasks count as "resolved"; every other status
/// counts as "open". Users with no assigned tasks still appear with
/// zero counts.
pub fn tasks_by_user(users: &[User], tasks: &[Task]) -> Vec<UserTaskBreakdown> {
    users
        .iter()
        .filter(|u| u.role != Role::Admin)
        .map(|u| {
            let assigned: Vec<_> = tasks
                .iter()
                .filter(|t| t.assigned_to_id == Some(u.id))
                .collect();
            let resolved = assigned.iter().filter(|t| t.status.is_completed()).count();

            UserTaskBreakdown {
                name: u.username.clone(),
                resolved,
                open: assigned.len() - resolved,
            }
        })
        .collect()
}

/// Counts tasks in a completed status (resolved or closed)
pub fn completed_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.status.is_completed()).count()
}

/// Counts tasks in a pending status (open or in progress)
pub fn pending_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.status.is_pending()).count()
}

/// Counts tasks currently in progress
pub fn in_progress_count(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::InProgress)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn project(is_active: bool) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "P".to_string(),
            description: None,
            manager_id: None,
            is_active,
            created_at: Utc::now(),
        }
    }

    fn task(project_id: Uuid, status: TaskStatus, assignee: Option<Uuid>) -> Task {
        Task {
            id: Uuid::new_v4(),
            project_id,
            title: "T".to_string(),
            description: None,
            status,
            assigned_to_id: assignee,
            resolution_notes: None,
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    fn user(role: Role, username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: String::new(),
            role,
            full_name: username.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_tasks_drops_orphans() {
        let kept_project = project(true);
        let tasks = vec![
            task(kept_project.id, TaskStatus::Open, None),
            task(Uuid::new_v4(), TaskStatus::Open, None), // project gone
        ];

        let valid = valid_tasks(tasks, &[kept_project.clone()]);

        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].project_id, kept_project.id);
    }

    #[test]
    fn test_valid_tasks_empty_projects_drops_everything() {
        let tasks = vec![task(Uuid::new_v4(), TaskStatus::Open, None)];
        assert!(valid_tasks(tasks, &[]).is_empty());
    }

    #[test]
    fn test_projects_by_status() {
        let projects = vec![project(true), project(true), project(false)];
        let counts = projects_by_status(&projects);

        assert_eq!(counts[0], StatusCount { name: "Active".to_string(), value: 2 });
        assert_eq!(counts[1], StatusCount { name: "Inactive".to_string(), value: 1 });
    }

    #[test]
    fn test_tasks_by_status_includes_zero_buckets() {
        let p = project(true);
        let tasks = vec![
            task(p.id, TaskStatus::Resolved, None),
            task(p.id, TaskStatus::Resolved, None),
            task(p.id, TaskStatus::Open, None),
        ];

        let counts = tasks_by_status(&tasks);

        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0], StatusCount { name: "open".to_string(), value: 1 });
        assert_eq!(counts[1], StatusCount { name: "in_progress".to_string(), value: 0 });
        assert_eq!(counts[2], StatusCount { name: "resolved".to_string(), value: 2 });
        assert_eq!(counts[3], StatusCount { name: "closed".to_string(), value: 0 });
    }

    #[test]
    fn test_tasks_by_user_skips_admins_and_counts_buckets() {
        let admin = user(Role::Admin, "admin");
        let dev = user(Role::User, "dev");
        let idle = user(Role::User, "idle");
        let p = project(true);

        let tasks = vec![
            task(p.id, TaskStatus::Resolved, Some(dev.id)),
            task(p.id, TaskStatus::Closed, Some(dev.id)),
            task(p.id, TaskStatus::InProgress, Some(dev.id)),
            task(p.id, TaskStatus::Open, Some(admin.id)),
        ];

        let breakdown = tasks_by_user(&[admin, dev, idle], &tasks);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(
            breakdown[0],
            UserTaskBreakdown { name: "dev".to_string(), resolved: 2, open: 1 }
        );
        assert_eq!(
            breakdown[1],
            UserTaskBreakdown { name: "idle".to_string(), resolved: 0, open: 0 }
        );
    }

    #[test]
    fn test_completed_and_pending_counts_partition() {
        let p = project(true);
        let tasks = vec![
            task(p.id, TaskStatus::Open, None),
            task(p.id, TaskStatus::InProgress, None),
            task(p.id, TaskStatus::Resolved, None),
            task(p.id, TaskStatus::Closed, None),
        ];

        assert_eq!(completed_count(&tasks), 2);
        assert_eq!(pending_count(&tasks), 2);
        assert_eq!(in_progress_count(&tasks), 1);
        assert_eq!(completed_count(&tasks) + pending_count(&tasks), tasks.len());
    }
}
