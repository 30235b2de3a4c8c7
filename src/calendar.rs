use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::{Priority, Task};

/// One month of calendar cells, Sunday-first, with leading blanks so the
/// first row aligns on the weekday of the 1st.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalendarCell {
    Blank,
    Day(DayCell),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub day: u32,
    /// ISO date of the cell, `YYYY-MM-DD`.
    pub date: String,
    pub is_today: bool,
    pub has_task: bool,
    /// Distinct priorities present that day, first-seen order; the host
    /// renders one indicator dot per entry.
    pub priorities: Vec<Priority>,
}

/// Builds the grid for a displayed month. Pure: fixed inputs (including the
/// explicit `today` reference) always produce the same grid.
pub fn month_grid(year: i32, month: u32, today: NaiveDate, tasks: &[Task]) -> MonthGrid {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("month is 1-12");
    let today_str = today.format("%Y-%m-%d").to_string();

    let leading = first.weekday().num_days_from_sunday();
    let mut cells = Vec::with_capacity(leading as usize + 31);
    for _ in 0..leading {
        cells.push(CalendarCell::Blank);
    }

    for day in 1..=days_in_month(year, month) {
        let date = format!("{year:04}-{month:02}-{day:02}");
        let mut has_task = false;
        let mut priorities = Vec::new();
        for task in tasks.iter().filter(|t| t.date == date) {
            has_task = true;
            if !priorities.contains(&task.priority) {
                priorities.push(task.priority);
            }
        }
        cells.push(CalendarCell::Day(DayCell {
            day,
            is_today: date == today_str,
            has_task,
            priorities,
            date,
        }));
    }

    MonthGrid { year, month, cells }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap();
    (first_next - Duration::days(1)).day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_on(date: &str, priority: Priority) -> Task {
        Task {
            id: format!("{date}-{priority:?}"),
            title: "t".to_string(),
            date: date.to_string(),
            time: "09:00".to_string(),
            end_time: None,
            priority,
            completed: false,
            created_at: "2024-06-01T00:00:00.000Z".to_string(),
            synced_to_tick_tick: false,
        }
    }

    fn day_cells(grid: &MonthGrid) -> Vec<&DayCell> {
        grid.cells
            .iter()
            .filter_map(|cell| match cell {
                CalendarCell::Day(day) => Some(day),
                CalendarCell::Blank => None,
            })
            .collect()
    }

    #[test]
    fn june_2024_aligns_on_saturday() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let grid = month_grid(2024, 6, today, &[]);

        // 2024-06-01 was a Saturday: six leading blanks, then 30 days.
        let blanks = grid
            .cells
            .iter()
            .take_while(|cell| matches!(cell, CalendarCell::Blank))
            .count();
        assert_eq!(blanks, 6);
        assert_eq!(grid.cells.len(), 36);

        let days = day_cells(&grid);
        assert_eq!(days.first().unwrap().day, 1);
        assert_eq!(days.last().unwrap().day, 30);
        assert_eq!(days[0].date, "2024-06-01");
    }

    #[test]
    fn marks_today_only_on_the_matching_cell() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let grid = month_grid(2024, 6, today, &[]);
        let todays: Vec<_> = day_cells(&grid).into_iter().filter(|c| c.is_today).collect();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].date, "2024-06-15");

        // Displaying another month: no cell is "today".
        let grid = month_grid(2024, 7, today, &[]);
        assert!(day_cells(&grid).iter().all(|c| !c.is_today));
    }

    #[test]
    fn priority_dots_are_deduplicated_in_first_seen_order() {
        let tasks = vec![
            task_on("2024-06-15", Priority::NotUrgentImportant),
            task_on("2024-06-15", Priority::UrgentImportant),
            task_on("2024-06-15", Priority::NotUrgentImportant),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let grid = month_grid(2024, 6, today, &tasks);

        let cell = day_cells(&grid)
            .into_iter()
            .find(|c| c.date == "2024-06-15")
            .unwrap();
        assert!(cell.has_task);
        assert_eq!(
            cell.priorities,
            vec![Priority::NotUrgentImportant, Priority::UrgentImportant]
        );

        let empty = day_cells(&grid)
            .into_iter()
            .find(|c| c.date == "2024-06-14")
            .unwrap();
        assert!(!empty.has_task);
        assert!(empty.priorities.is_empty());
    }

    #[test]
    fn grid_is_deterministic_for_fixed_inputs() {
        let tasks = vec![task_on("2024-02-29", Priority::UrgentImportant)];
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            month_grid(2024, 2, today, &tasks),
            month_grid(2024, 2, today, &tasks)
        );
    }

    #[test]
    fn day_counts_cover_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 6), 30);
    }
}
