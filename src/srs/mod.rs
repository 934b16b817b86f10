pub mod clock;
pub mod due_selector;
pub mod retention;
pub mod sm2;

pub use clock::{Clock, FixedClock, SystemClock};
pub use due_selector::{
  build_review_queue, count_due_within, limit, select_due, sort_by_priority, summarize_by_note,
  DueScope, NoteDueSummary, Schedulable,
};
pub use retention::{retention_rate, study_stats, StudyStats};
pub use sm2::{calculate_sm2, ScheduleState, Sm2Result};
