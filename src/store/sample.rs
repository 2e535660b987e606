//! Demo dataset: three projects, their categories and tasks.
//!
//! Dates are laid out relative to `today` so the board always has something
//! in each bucket.

use chrono::{Days, NaiveDate};

use crate::model::{
    Category, NewProject, NewTask, Project, ProjectId, Subtask, Task, TaskId, TaskPriority,
    TaskStatus,
};
use crate::ops::progress::apply_progress;

fn offset(today: NaiveDate, days: i64) -> String {
    let date = if days >= 0 {
        today.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        today.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    date.unwrap_or(today).format("%Y-%m-%d").to_string()
}

struct Seed {
    id: &'static str,
    title: &'static str,
    assignee: &'static str,
    due_in: i64,
    created_ago: i64,
    status: TaskStatus,
    priority: TaskPriority,
    tags: &'static [&'static str],
    comments: &'static [&'static str],
    subtasks: &'static [(&'static str, bool)],
    attachments: &'static [&'static str],
    notes: &'static str,
}

fn task(today: NaiveDate, category: &str, seed: Seed) -> Task {
    let mut task = Task::new(
        TaskId::from(seed.id),
        NewTask {
            title: seed.title.to_string(),
            description: format!("Description of {}", seed.title.to_lowercase()),
            assignee: seed.assignee.to_string(),
            due_date: offset(today, seed.due_in),
            status: seed.status,
            priority: seed.priority,
            category: category.to_string(),
            tags: seed.tags.iter().map(|t| t.to_string()).collect(),
            created_at: offset(today, -seed.created_ago),
            completed_at: (seed.status == TaskStatus::Completed).then(|| offset(today, -1)),
            comments: seed.comments.iter().map(|c| c.to_string()).collect(),
            subtasks: seed
                .subtasks
                .iter()
                .map(|(title, completed)| Subtask {
                    title: title.to_string(),
                    description: String::new(),
                    completed: *completed,
                })
                .collect(),
            progress: if seed.status == TaskStatus::Completed { 100 } else { 0 },
            attachments: seed.attachments.iter().map(|a| a.to_string()).collect(),
            notes: seed.notes.to_string(),
        },
    );
    apply_progress(&mut task);
    task
}

fn category(name: &str, tasks: Vec<Task>) -> Category {
    Category {
        name: name.to_string(),
        tasks,
    }
}

fn project(id: &str, name: &str, categories: Vec<Category>) -> Project {
    Project::new(
        ProjectId::from(id),
        NewProject {
            name: name.to_string(),
            description: format!("Description of {}", name),
            categories,
        },
    )
}

/// The demo projects, dated around `today`
pub fn sample_projects(today: NaiveDate) -> Vec<Project> {
    vec![
        project(
            "1",
            "Project A",
            vec![
                category(
                    "Category 1",
                    vec![
                        task(
                            today,
                            "Category 1",
                            Seed {
                                id: "101",
                                title: "Task 1.1",
                                assignee: "Juan Pérez",
                                due_in: 0,
                                created_ago: 9,
                                status: TaskStatus::Pending,
                                priority: TaskPriority::High,
                                tags: &["important", "urgent"],
                                comments: &["Review before Friday", "Confirm with the client"],
                                subtasks: &[("Subtask 1.1.1", false), ("Subtask 1.1.2", false)],
                                attachments: &["file1.pdf", "image1.png"],
                                notes: "This task is a priority.",
                            },
                        ),
                        task(
                            today,
                            "Category 1",
                            Seed {
                                id: "102",
                                title: "Task 1.2",
                                assignee: "Ana López",
                                due_in: 2,
                                created_ago: 8,
                                status: TaskStatus::InProgress,
                                priority: TaskPriority::Medium,
                                tags: &["review"],
                                comments: &["Awaiting approval"],
                                subtasks: &[("Subtask 1.2.1", true), ("Subtask 1.2.2", false)],
                                attachments: &[],
                                notes: "Check progress with the team.",
                            },
                        ),
                    ],
                ),
                category(
                    "Category 2",
                    vec![task(
                        today,
                        "Category 2",
                        Seed {
                            id: "103",
                            title: "Task 2.1",
                            assignee: "Carlos Gómez",
                            due_in: 5,
                            created_ago: 12,
                            status: TaskStatus::Completed,
                            priority: TaskPriority::Low,
                            tags: &["finished"],
                            comments: &["Good job"],
                            subtasks: &[],
                            attachments: &["final-report.pdf"],
                            notes: "Completed without issues.",
                        },
                    )],
                ),
            ],
        ),
        project(
            "2",
            "Project B",
            vec![category(
                "Category 1",
                vec![
                    task(
                        today,
                        "Category 1",
                        Seed {
                            id: "201",
                            title: "Task 1.1",
                            assignee: "Luis Martínez",
                            due_in: 40,
                            created_ago: 7,
                            status: TaskStatus::Pending,
                            priority: TaskPriority::High,
                            tags: &["urgent"],
                            comments: &[],
                            subtasks: &[],
                            attachments: &[],
                            notes: "Needs immediate attention.",
                        },
                    ),
                    task(
                        today,
                        "Category 1",
                        Seed {
                            id: "202",
                            title: "Task 1.2",
                            assignee: "Marta Ruiz",
                            due_in: -45,
                            created_ago: 60,
                            status: TaskStatus::Delayed,
                            priority: TaskPriority::Medium,
                            tags: &[],
                            comments: &["Blocked on supplier"],
                            subtasks: &[("Call supplier", true), ("Reschedule", false), ("Sign off", false), ("Archive", false)],
                            attachments: &[],
                            notes: "",
                        },
                    ),
                ],
            )],
        ),
        project("3", "Project C", Vec::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::classify::{ClosedTasks, classify_project};
    use crate::ops::progress::recompute_progress;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    #[test]
    fn ids_are_unique() {
        let projects = sample_projects(today());
        let mut project_ids: Vec<_> = projects.iter().map(|p| p.id.clone()).collect();
        project_ids.dedup();
        assert_eq!(project_ids.len(), 3);
        for p in &projects {
            let mut ids: Vec<_> = p.tasks().map(|t| t.id.clone()).collect();
            let n = ids.len();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), n);
        }
    }

    #[test]
    fn progress_matches_subtasks() {
        for p in sample_projects(today()) {
            for t in p.tasks() {
                assert_eq!(t.progress, recompute_progress(t), "task {}", t.id);
            }
        }
        let projects = sample_projects(today());
        let t202 = projects[1].find_task(&TaskId::from("202")).unwrap();
        assert_eq!(t202.progress, 25);
    }

    #[test]
    fn dates_relative_to_today() {
        let projects = sample_projects(today());
        let t101 = projects[0].find_task(&TaskId::from("101")).unwrap();
        assert_eq!(t101.due_date, "2025-04-01");
        assert_eq!(t101.created_at, "2025-03-23");
        let t201 = projects[1].find_task(&TaskId::from("201")).unwrap();
        assert_eq!(t201.due_date, "2025-05-11");
    }

    #[test]
    fn board_has_something_in_each_bucket() {
        let projects = sample_projects(today());
        let a = classify_project(&projects[0], today(), ClosedTasks::Exclude);
        assert_eq!(a.today.len(), 1);
        assert_eq!(a.this_week.len(), 1);
        // 103 is completed
        assert!(a.this_month.is_empty());
        let b = classify_project(&projects[1], today(), ClosedTasks::Exclude);
        assert_eq!(b.later.len(), 1);
        assert_eq!(b.unscheduled.len(), 1);
    }
}
