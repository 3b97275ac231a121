//! Resource instance data models and write-time normalization.

use jiff::Timestamp;

use crate::{
    ids::{CourseId, InstanceUuid},
    usage::{ObjectVersion, Usage},
};

/// Local persistent row for one embedding of a remote node in a course.
///
/// The local store owns this row; the repository service owns the node and
/// usage it points at. A `None` usage id means the embedding is not durably
/// registered remotely yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInstance {
    pub id: InstanceUuid,
    pub course_id: CourseId,
    pub name: String,

    /// Remote object URL, `ccrep://<repository>/<node-id>`.
    pub object_url: String,
    pub object_version: ObjectVersion,

    pub force_download: bool,
    pub popup_window: bool,
    pub window_options: String,
    pub track_views: bool,

    /// Usage id assigned by the repository once registered.
    pub usage_id: Option<String>,

    /// Concrete node version the usage resolved to when "latest" was
    /// requested.
    pub usage_version: Option<String>,

    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

impl ResourceInstance {
    /// Row state after the remote usage was registered.
    #[must_use]
    pub(crate) fn with_usage(mut self, usage: &Usage) -> Self {
        self.usage_version = self
            .object_version
            .is_latest()
            .then(|| usage.node_version.clone());
        self.usage_id = Some(usage.usage_id.clone());
        self
    }
}

/// Caller-supplied candidate record for a create or update write.
///
/// Option fields distinguish "unset on the editing form" from an explicit
/// value; normalization resolves them all before anything is persisted.
#[derive(Debug, Clone, Default)]
pub struct NewInstance {
    pub name: String,
    pub object_url: String,
    pub object_version: ObjectVersion,

    /// Defaults to the ambient current course when absent.
    pub course_id: Option<CourseId>,

    pub force_download: Option<bool>,
    pub popup_window: Option<bool>,
    pub window_options: Option<String>,
    pub track_views: Option<bool>,
}

impl NewInstance {
    /// Build the pending row to insert: flags normalized, course defaulted
    /// to the ambient one, both timestamps stamped, no usage registered.
    #[must_use]
    pub(crate) fn into_pending(self, ambient_course: CourseId, now: Timestamp) -> ResourceInstance {
        let course_id = self.course_id.unwrap_or(ambient_course);
        let (force_download, popup_window, window_options, track_views) = self.normalized_flags();

        ResourceInstance {
            id: InstanceUuid::generate(),
            course_id,
            name: self.name,
            object_url: self.object_url,
            object_version: self.object_version,
            force_download,
            popup_window,
            window_options,
            track_views,
            usage_id: None,
            usage_version: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Apply this candidate over `current`, keeping its identity and
    /// creation timestamp. The usage binding is cleared; the caller
    /// re-registers it.
    #[must_use]
    pub(crate) fn into_updated(
        self,
        current: &ResourceInstance,
        ambient_course: CourseId,
        now: Timestamp,
    ) -> ResourceInstance {
        let course_id = self.course_id.unwrap_or(ambient_course);
        let (force_download, popup_window, window_options, track_views) = self.normalized_flags();

        ResourceInstance {
            id: current.id,
            course_id,
            name: self.name,
            object_url: self.object_url,
            object_version: self.object_version,
            force_download,
            popup_window,
            window_options,
            track_views,
            usage_id: None,
            usage_version: None,
            created_at: current.created_at,
            modified_at: now,
        }
    }

    /// Resolve the display and tracking flags.
    ///
    /// Popup and forced download are mutually exclusive; popup wins when
    /// both are requested, matching the editing form's radio semantics.
    /// Window options only survive alongside an active popup, and the
    /// tracking flag is zeroed when unset.
    fn normalized_flags(&self) -> (bool, bool, String, bool) {
        let popup_window = self.popup_window.unwrap_or(false);
        let force_download = !popup_window && self.force_download.unwrap_or(false);
        let window_options = if popup_window {
            self.window_options.clone().unwrap_or_default()
        } else {
            String::new()
        };
        let track_views = self.track_views.unwrap_or(false);

        (force_download, popup_window, window_options, track_views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> NewInstance {
        NewInstance {
            name: "Intro lecture".to_owned(),
            object_url: "ccrep://repo/node123".to_owned(),
            object_version: ObjectVersion::Exact("1".to_owned()),
            ..NewInstance::default()
        }
    }

    #[test]
    fn pending_row_defaults_course_to_ambient() {
        let row = candidate().into_pending(CourseId::new(5), Timestamp::now());

        assert_eq!(row.course_id, CourseId::new(5));
        assert!(row.usage_id.is_none());
        assert_eq!(row.created_at, row.modified_at);
    }

    #[test]
    fn explicit_course_wins_over_ambient() {
        let row = NewInstance {
            course_id: Some(CourseId::new(9)),
            ..candidate()
        }
        .into_pending(CourseId::new(5), Timestamp::now());

        assert_eq!(row.course_id, CourseId::new(9));
    }

    #[test]
    fn popup_disables_force_download() {
        let row = NewInstance {
            force_download: Some(true),
            popup_window: Some(true),
            window_options: Some("width=640".to_owned()),
            ..candidate()
        }
        .into_pending(CourseId::new(5), Timestamp::now());

        assert!(!row.force_download);
        assert!(row.popup_window);
        assert_eq!(row.window_options, "width=640");
    }

    #[test]
    fn window_options_cleared_without_popup() {
        let row = NewInstance {
            force_download: Some(true),
            window_options: Some("width=640".to_owned()),
            ..candidate()
        }
        .into_pending(CourseId::new(5), Timestamp::now());

        assert!(row.force_download);
        assert!(!row.popup_window);
        assert_eq!(row.window_options, "");
    }

    #[test]
    fn unset_flags_resolve_to_defaults() {
        let row = candidate().into_pending(CourseId::new(5), Timestamp::now());

        assert!(!row.force_download);
        assert!(!row.popup_window);
        assert_eq!(row.window_options, "");
        assert!(!row.track_views);
    }

    #[test]
    fn updated_row_keeps_identity_and_creation_time() {
        let created = candidate().into_pending(CourseId::new(5), Timestamp::now());
        let later = created.modified_at + jiff::SignedDuration::from_secs(60);

        let updated = NewInstance {
            name: "Renamed lecture".to_owned(),
            ..candidate()
        }
        .into_updated(&created, CourseId::new(5), later);

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.modified_at, later);
        assert_eq!(updated.name, "Renamed lecture");
        assert!(updated.usage_id.is_none());
    }

    #[test]
    fn usage_version_recorded_only_for_latest_requests() {
        let usage = Usage {
            usage_id: "u1".to_owned(),
            node_version: "4".to_owned(),
        };

        let latest = NewInstance {
            object_version: ObjectVersion::Latest,
            ..candidate()
        }
        .into_pending(CourseId::new(5), Timestamp::now())
        .with_usage(&usage);
        assert_eq!(latest.usage_version.as_deref(), Some("4"));
        assert_eq!(latest.usage_id.as_deref(), Some("u1"));

        let pinned = candidate()
            .into_pending(CourseId::new(5), Timestamp::now())
            .with_usage(&usage);
        assert!(pinned.usage_version.is_none());
    }
}
