use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, path::PathBuf};
use time::{Time, UtcOffset};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Id(pub String);

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Url(pub String);

/// Run lifecycle of a job. The core only ever distinguishes `Scheduled` (the
/// readiness test applies) from everything else; the remaining transitions are
/// driven by the execution engine.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Running,
    Completed,
    Failed,
    Scheduled,
    Disabled,
    Queued,
    /// Uninitialized or corrupt; rejected by validation.
    Null,
}

impl Default for Status {
    fn default() -> Self {
        Status::Disabled
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum BackupType {
    #[serde(rename = "Google Drive")]
    GoogleDrive,
    #[serde(rename = "null")]
    Null,
}

impl Default for BackupType {
    fn default() -> Self {
        BackupType::Null
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum RetentionPolicy {
    #[serde(rename = "keep_all")]
    KeepAll,
    #[serde(rename = "delete_old")]
    DeleteOldest,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        RetentionPolicy::DeleteOldest
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl Default for Recurrence {
    fn default() -> Self {
        Recurrence::Daily
    }
}

/// Weekday tokens as they appear in job definitions. Only meaningful for
/// `Recurrence::Weekly`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum ScheduleDay {
    #[serde(rename = "M")]
    Monday,
    #[serde(rename = "T")]
    Tuesday,
    #[serde(rename = "W")]
    Wednesday,
    #[serde(rename = "R")]
    Thursday,
    #[serde(rename = "F")]
    Friday,
    #[serde(rename = "U")]
    Saturday,
    #[serde(rename = "S")]
    Sunday,
}

impl From<time::Weekday> for ScheduleDay {
    fn from(weekday: time::Weekday) -> Self {
        use time::Weekday;
        match weekday {
            Weekday::Monday => ScheduleDay::Monday,
            Weekday::Tuesday => ScheduleDay::Tuesday,
            Weekday::Wednesday => ScheduleDay::Wednesday,
            Weekday::Thursday => ScheduleDay::Thursday,
            Weekday::Friday => ScheduleDay::Friday,
            Weekday::Saturday => ScheduleDay::Saturday,
            Weekday::Sunday => ScheduleDay::Sunday,
        }
    }
}

/// Wall-clock time of day together with the UTC offset it is anchored to. The
/// offset is optional in the representation so that a zone-less time coming
/// out of a parser is a validation failure, not unparseable input.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct ScheduleTime {
    pub time: Time,
    #[serde(default)]
    pub offset: Option<UtcOffset>,
}

impl ScheduleTime {
    pub fn new(time: Time, offset: UtcOffset) -> Self {
        ScheduleTime {
            time,
            offset: Some(offset),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ScriptKind {
    Pre,
    Post,
}

impl std::fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptKind::Pre => f.write_str("pre-backup"),
            ScriptKind::Post => f.write_str("post-backup"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("job id must be a non-empty string")]
    EmptyJobId,
    #[error("job status cannot be null")]
    NullStatus,
    #[error("no source path configured")]
    MissingSourcePath,
    #[error("source path {} does not exist", .0.display())]
    SourcePathNotFound(PathBuf),
    #[error("backup type cannot be null")]
    NullBackupType,
    #[error("no destination url configured")]
    MissingDestinationUrl,
    #[error("max file retention size must be a positive number of megabytes")]
    ZeroRetentionSize,
    #[error("schedule time must carry a utc offset")]
    MissingUtcOffset,
    #[error("schedule day of month {0} is outside 1..=31")]
    DayOfMonthOutOfRange(u8),
    #[error("{0} script path {} does not exist", .1.display())]
    ScriptNotFound(ScriptKind, PathBuf),
}

/// One backup job definition: source, destination, schedule, and lifecycle
/// status. A data record with no behavior beyond self-validation; the
/// execution engine and the file parser live elsewhere.
///
/// Identity is the `id` and nothing else: equality and hashing ignore every
/// other attribute, and the id cannot change after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Job {
    id: Id,
    pub status: Status,

    pub source_path: Option<PathBuf>,
    pub recursive: bool,

    pub compression: bool,
    pub backup_type: BackupType,
    pub destination_url: Option<Url>,
    pub max_file_retention_size: Option<u64>,
    pub retention_policy: RetentionPolicy,

    pub schedule_time: Option<ScheduleTime>,
    pub recurrence: Recurrence,
    pub schedule_days: BTreeSet<ScheduleDay>,
    pub schedule_day_of_month: Option<u8>,

    pub script_pre_path: Option<PathBuf>,
    pub script_post_path: Option<PathBuf>,
}

impl Default for Job {
    fn default() -> Self {
        Job::new(Id::default())
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Job {}

impl std::hash::Hash for Job {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Job {
    /// A fresh job is `Disabled` until its configuration is complete and the
    /// caller explicitly marks it `Scheduled`.
    pub fn new(id: Id) -> Self {
        Job {
            id,
            status: Status::Disabled,
            source_path: None,
            recursive: true,
            compression: true,
            backup_type: BackupType::Null,
            destination_url: None,
            max_file_retention_size: None,
            retention_policy: RetentionPolicy::DeleteOldest,
            schedule_time: None,
            recurrence: Recurrence::Daily,
            schedule_days: BTreeSet::new(),
            schedule_day_of_month: None,
            script_pre_path: None,
            script_post_path: None,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Checks every admission invariant in order and reports the first
    /// violated one. Reads the job and the filesystem (path existence),
    /// mutates nothing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.check_id()?;
        self.check_status()?;
        self.check_source()?;
        self.check_destination()?;
        self.check_schedule()?;
        self.check_scripts()?;
        Ok(())
    }

    fn check_id(&self) -> Result<(), ValidationError> {
        if self.id.0.trim().is_empty() {
            return Err(ValidationError::EmptyJobId);
        }
        Ok(())
    }

    fn check_status(&self) -> Result<(), ValidationError> {
        if self.status == Status::Null {
            return Err(ValidationError::NullStatus);
        }
        Ok(())
    }

    fn check_source(&self) -> Result<(), ValidationError> {
        match &self.source_path {
            None => Err(ValidationError::MissingSourcePath),
            Some(path) if !path.exists() => Err(ValidationError::SourcePathNotFound(path.clone())),
            Some(_) => Ok(()),
        }
    }

    fn check_destination(&self) -> Result<(), ValidationError> {
        if self.backup_type == BackupType::Null {
            return Err(ValidationError::NullBackupType);
        }
        match &self.destination_url {
            Some(url) if !url.0.is_empty() => {}
            _ => return Err(ValidationError::MissingDestinationUrl),
        }
        if self.max_file_retention_size == Some(0) {
            return Err(ValidationError::ZeroRetentionSize);
        }
        Ok(())
    }

    fn check_schedule(&self) -> Result<(), ValidationError> {
        if let Some(schedule_time) = &self.schedule_time {
            if schedule_time.offset.is_none() {
                return Err(ValidationError::MissingUtcOffset);
            }
        }
        // recurrence-specific fields are only checked against the active policy
        match self.recurrence {
            Recurrence::Daily => Ok(()),
            // weekday token validity is structural; an empty set simply never fires
            Recurrence::Weekly => Ok(()),
            Recurrence::Monthly => match self.schedule_day_of_month {
                Some(day) if !(1..=31).contains(&day) => {
                    Err(ValidationError::DayOfMonthOutOfRange(day))
                }
                _ => Ok(()),
            },
        }
    }

    fn check_scripts(&self) -> Result<(), ValidationError> {
        for (kind, path) in [
            (ScriptKind::Pre, &self.script_pre_path),
            (ScriptKind::Post, &self.script_post_path),
        ] {
            if let Some(path) = path {
                if !path.exists() {
                    return Err(ValidationError::ScriptNotFound(kind, path.clone()));
                }
            }
        }
        Ok(())
    }
}
