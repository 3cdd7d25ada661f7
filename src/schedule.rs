use crate::model::job::{Job, Recurrence, ScheduleDay};
use time::OffsetDateTime;

impl Job {
    /// Whether this job's scheduled occurrence has arrived as of `now`,
    /// evaluated in the job's own UTC offset. This is the recurrence test
    /// only; the scheduler layers the status filter on top of it.
    ///
    /// A job with no schedule time is never due. A schedule time without an
    /// offset is an error: it means a pool admission bypassed validation.
    pub fn is_due(&self, now: OffsetDateTime) -> eyre::Result<bool> {
        let schedule_time = match &self.schedule_time {
            Some(schedule_time) => schedule_time,
            None => return Ok(false),
        };
        let offset = schedule_time
            .offset
            .ok_or_else(|| eyre::eyre!("schedule time for job '{}' has no utc offset", self.id()))?;
        let local = now.to_offset(offset);
        let time_arrived = local.time() >= schedule_time.time;
        let due = match self.recurrence {
            Recurrence::Daily => time_arrived,
            Recurrence::Weekly => {
                time_arrived && self.schedule_days.contains(&ScheduleDay::from(local.weekday()))
            }
            Recurrence::Monthly => {
                // an unset day-of-month imposes no day constraint
                let day_arrived = self
                    .schedule_day_of_month
                    .map(|day| day <= local.day())
                    .unwrap_or(true);
                time_arrived && day_arrived
            }
        };
        Ok(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::job::{Id, ScheduleTime, Status};
    use maplit::btreeset;
    use time::macros::{datetime, offset, time};

    fn scheduled_job(recurrence: Recurrence) -> Job {
        let mut job = Job::new(Id("readiness-test".to_string()));
        job.status = Status::Scheduled;
        job.schedule_time = Some(ScheduleTime::new(time!(02:00), offset!(-8)));
        job.recurrence = recurrence;
        job
    }

    mod daily {
        use super::*;

        #[test]
        fn should_be_due_at_the_scheduled_minute() {
            let job = scheduled_job(Recurrence::Daily);

            let due = job.is_due(datetime!(2024-01-01 02:00:00 -08:00)).unwrap();

            assert!(due);
        }

        #[test]
        fn should_not_be_due_before_the_scheduled_minute() {
            let job = scheduled_job(Recurrence::Daily);

            let due = job.is_due(datetime!(2024-01-01 01:59:00 -08:00)).unwrap();

            assert!(!due);
        }

        #[test]
        fn should_evaluate_now_in_the_jobs_own_offset() {
            let job = scheduled_job(Recurrence::Daily);

            // 10:30 UTC is 02:30 at -08:00
            assert!(job.is_due(datetime!(2024-01-01 10:30:00 UTC)).unwrap());
            // 09:59 UTC is 01:59 at -08:00
            assert!(!job.is_due(datetime!(2024-01-01 09:59:00 UTC)).unwrap());
        }
    }

    mod weekly {
        use super::*;

        fn weekly_job() -> Job {
            let mut job = scheduled_job(Recurrence::Weekly);
            job.schedule_days = btreeset![ScheduleDay::Monday, ScheduleDay::Wednesday];
            job
        }

        #[test]
        fn should_not_be_due_on_an_unscheduled_day() {
            let job = weekly_job();

            // 2024-01-02 is a Tuesday
            let due = job.is_due(datetime!(2024-01-02 03:00:00 -08:00)).unwrap();

            assert!(!due);
        }

        #[test]
        fn should_be_due_on_a_scheduled_day_after_the_scheduled_time() {
            let job = weekly_job();

            // 2024-01-03 is a Wednesday
            let due = job.is_due(datetime!(2024-01-03 03:00:00 -08:00)).unwrap();

            assert!(due);
        }

        #[test]
        fn should_not_be_due_on_a_scheduled_day_before_the_scheduled_time() {
            let job = weekly_job();

            let due = job.is_due(datetime!(2024-01-03 01:00:00 -08:00)).unwrap();

            assert!(!due);
        }

        #[test]
        fn should_take_the_weekday_from_the_jobs_own_offset() {
            let job = weekly_job();

            // Thursday 04:00 UTC is still Wednesday 20:00 at -08:00
            let due = job.is_due(datetime!(2024-01-04 04:00:00 UTC)).unwrap();

            assert!(due);
        }

        #[test]
        fn should_never_be_due_with_no_scheduled_days() {
            let job = scheduled_job(Recurrence::Weekly);

            let due = job.is_due(datetime!(2024-01-03 03:00:00 -08:00)).unwrap();

            assert!(!due);
        }
    }

    mod monthly {
        use super::*;

        fn monthly_job() -> Job {
            let mut job = scheduled_job(Recurrence::Monthly);
            job.schedule_day_of_month = Some(15);
            job
        }

        #[test]
        fn should_be_due_on_the_scheduled_day() {
            let job = monthly_job();

            let due = job.is_due(datetime!(2024-01-15 03:00:00 -08:00)).unwrap();

            assert!(due);
        }

        #[test]
        fn should_be_due_after_the_scheduled_day() {
            let job = monthly_job();

            let due = job.is_due(datetime!(2024-01-20 03:00:00 -08:00)).unwrap();

            assert!(due);
        }

        #[test]
        fn should_not_be_due_before_the_scheduled_day() {
            let job = monthly_job();

            let due = job.is_due(datetime!(2024-01-10 03:00:00 -08:00)).unwrap();

            assert!(!due);
        }

        #[test]
        fn should_treat_an_unset_day_of_month_as_no_constraint() {
            let job = scheduled_job(Recurrence::Monthly);

            let due = job.is_due(datetime!(2024-01-02 03:00:00 -08:00)).unwrap();

            assert!(due);
        }
    }

    #[test]
    fn should_never_be_due_without_a_schedule_time() {
        let mut job = scheduled_job(Recurrence::Daily);
        job.schedule_time = None;

        let due = job.is_due(datetime!(2024-01-01 12:00:00 -08:00)).unwrap();

        assert!(!due);
    }

    #[test]
    fn should_error_on_a_zone_less_schedule_time() {
        let mut job = scheduled_job(Recurrence::Daily);
        job.schedule_time = Some(ScheduleTime {
            time: time!(02:00),
            offset: None,
        });

        let result = job.is_due(datetime!(2024-01-01 12:00:00 -08:00));

        assert!(result.is_err());
    }
}
