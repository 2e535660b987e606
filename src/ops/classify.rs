use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::model::{Project, Task, TaskId, TaskStatus, TaskSummary, parse_due_date};

/// Anything the board can place: it has a due date and a status
pub trait Schedulable {
    fn task_id(&self) -> &TaskId;
    fn due_date(&self) -> &str;
    fn status(&self) -> TaskStatus;
}

impl Schedulable for Task {
    fn task_id(&self) -> &TaskId {
        &self.id
    }
    fn due_date(&self) -> &str {
        &self.fields.due_date
    }
    fn status(&self) -> TaskStatus {
        self.fields.status
    }
}

impl Schedulable for TaskSummary {
    fn task_id(&self) -> &TaskId {
        &self.id
    }
    fn due_date(&self) -> &str {
        &self.due_date
    }
    fn status(&self) -> TaskStatus {
        self.status
    }
}

/// Temporal bucket of a due date relative to a reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Today,
    ThisWeek,
    ThisMonth,
    Later,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Today,
        Bucket::ThisWeek,
        Bucket::ThisMonth,
        Bucket::Later,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            Bucket::Today => "Due today",
            Bucket::ThisWeek => "Due this week",
            Bucket::ThisMonth => "Due this month",
            Bucket::Later => "Due later",
        }
    }
}

/// Whether completed and cancelled tasks take part in classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosedTasks {
    #[default]
    Exclude,
    Include,
}

/// The day windows derived from a reference day. Weeks start on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windows {
    pub today: NaiveDate,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
}

impl Windows {
    pub fn around(reference: NaiveDate) -> Self {
        let back_to_sunday = u64::from(reference.weekday().num_days_from_sunday());
        let week_start = reference
            .checked_sub_days(Days::new(back_to_sunday))
            .unwrap_or(reference);
        let week_end = week_start
            .checked_add_days(Days::new(6))
            .unwrap_or(NaiveDate::MAX);
        let month_start =
            NaiveDate::from_ymd_opt(reference.year(), reference.month(), 1).unwrap_or(reference);
        let month_end = month_start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Windows {
            today: reference,
            week_start,
            week_end,
            month_start,
            month_end,
        }
    }

    /// First matching window wins: today, this week, this month, later.
    /// Dates before every window match nothing.
    pub fn bucket_for(&self, due: NaiveDate) -> Option<Bucket> {
        if due == self.today {
            Some(Bucket::Today)
        } else if self.week_start <= due && due <= self.week_end {
            Some(Bucket::ThisWeek)
        } else if self.month_start <= due && due <= self.month_end {
            Some(Bucket::ThisMonth)
        } else if due > self.month_end {
            Some(Bucket::Later)
        } else {
            None
        }
    }
}

/// One placed task, with the name of the category it was found under (if any)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardEntry<'a, T> {
    pub task: &'a T,
    pub category: Option<&'a str>,
}

/// Classification result. Each bucket keeps input order. Tasks whose due date
/// is missing, unparsable or already past every window land in `unscheduled`
/// instead of vanishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board<'a, T> {
    pub today: Vec<BoardEntry<'a, T>>,
    pub this_week: Vec<BoardEntry<'a, T>>,
    pub this_month: Vec<BoardEntry<'a, T>>,
    pub later: Vec<BoardEntry<'a, T>>,
    pub unscheduled: Vec<BoardEntry<'a, T>>,
}

impl<T> Default for Board<'_, T> {
    fn default() -> Self {
        Board {
            today: Vec::new(),
            this_week: Vec::new(),
            this_month: Vec::new(),
            later: Vec::new(),
            unscheduled: Vec::new(),
        }
    }
}

impl<'a, T> Board<'a, T> {
    pub fn bucket(&self, bucket: Bucket) -> &[BoardEntry<'a, T>] {
        match bucket {
            Bucket::Today => &self.today,
            Bucket::ThisWeek => &self.this_week,
            Bucket::ThisMonth => &self.this_month,
            Bucket::Later => &self.later,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<BoardEntry<'a, T>> {
        match bucket {
            Bucket::Today => &mut self.today,
            Bucket::ThisWeek => &mut self.this_week,
            Bucket::ThisMonth => &mut self.this_month,
            Bucket::Later => &mut self.later,
        }
    }

    /// Number of tasks in the four dated buckets
    pub fn scheduled_len(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.bucket(*b).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled_len() == 0 && self.unscheduled.is_empty()
    }

    fn place(&mut self, windows: &Windows, entry: BoardEntry<'a, T>)
    where
        T: Schedulable,
    {
        let due = entry.task.due_date();
        match parse_due_date(due).and_then(|d| windows.bucket_for(d)) {
            Some(bucket) => self.bucket_mut(bucket).push(entry),
            None => {
                tracing::debug!(
                    task = %entry.task.task_id(),
                    due_date = due,
                    "task matches no due-date bucket"
                );
                self.unscheduled.push(entry);
            }
        }
    }
}

fn admitted<T: Schedulable>(task: &T, policy: ClosedTasks) -> bool {
    policy == ClosedTasks::Include || !task.status().is_closed()
}

/// Partition tasks into due-date buckets relative to `reference`.
pub fn classify<T: Schedulable>(tasks: &[T], reference: NaiveDate, policy: ClosedTasks) -> Board<'_, T> {
    let windows = Windows::around(reference);
    let mut board = Board::default();
    for task in tasks.iter().filter(|t| admitted(*t, policy)) {
        board.place(
            &windows,
            BoardEntry {
                task,
                category: None,
            },
        );
    }
    board
}

/// Classify the tasks embedded in a project's categories, tagging each entry
/// with its category name.
pub fn classify_project(project: &Project, reference: NaiveDate, policy: ClosedTasks) -> Board<'_, Task> {
    let windows = Windows::around(reference);
    let mut board = Board::default();
    for category in &project.categories {
        for task in category.tasks.iter().filter(|t| admitted(*t, policy)) {
            board.place(
                &windows,
                BoardEntry {
                    task,
                    category: Some(category.name.as_str()),
                },
            );
        }
    }
    board
}
