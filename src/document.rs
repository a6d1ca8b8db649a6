//! The planner document - the unit of persistence, one per week key.
//!
//! Documents travel as JSON with camelCase field names. Deserialization is
//! deliberately lenient: payloads arrive from storage, from the sync loop's
//! local cache, and from user-supplied import files, and a malformed field
//! must fall back to its default rather than reject the whole document.
//! `PlannerDocument::from_value` is the single entry point for that.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Palette for worker records (tailwind class names, matching the UI).
pub const PERSON_COLORS: [&str; 8] = [
    "bg-rose-500",
    "bg-amber-500",
    "bg-emerald-500",
    "bg-sky-500",
    "bg-violet-500",
    "bg-orange-500",
    "bg-teal-500",
    "bg-fuchsia-500",
];

/// Palette for job-site records.
pub const SITE_COLORS: [&str; 8] = [
    "bg-slate-500",
    "bg-red-400",
    "bg-amber-400",
    "bg-lime-500",
    "bg-cyan-500",
    "bg-blue-500",
    "bg-purple-500",
    "bg-pink-500",
];

/// Key for a schedule cell annotation: `<siteId>|<dateKey>`.
pub fn cell_key(site_id: &str, date_key: &str) -> String {
    format!("{}|{}", site_id, date_key)
}

/// 31-based string hash used to pick a stable default site color.
fn hash_string(s: &str) -> u32 {
    s.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32))
}

fn today_key() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

// ============================================================================
// Lenient Value helpers
// ============================================================================

/// Extract the logical timestamp of a raw document.
///
/// Mirrors `Number(doc.updatedAt || 0)` semantics: numbers and numeric
/// strings count, anything non-finite or non-positive is 0.
pub fn timestamp_of(doc: &Value) -> u64 {
    let raw = match doc.get("updatedAt") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|t| t.is_finite() && *t > 0.0)
        .map(|t| t as u64)
        .unwrap_or(0)
}

/// Extract the writing session's id from a raw document, if present.
pub fn client_id_of(doc: &Value) -> Option<&str> {
    doc.get("clientId").and_then(Value::as_str)
}

/// Whether a raw value looks like a planner document at all.
///
/// Candidates without any of the three core arrays are rejected during load
/// and poll so that junk (nulls, error bodies, empty objects) never replaces
/// local state.
pub fn has_payload(doc: &Value) -> bool {
    doc.is_object()
        && ["people", "sites", "assignments"]
            .iter()
            .any(|k| doc.get(*k).map(Value::is_array).unwrap_or(false))
}

/// Shallow merge: top-level keys of `data` replace the corresponding keys of
/// `base`; all other keys of `base` survive. Nested maps (e.g. `notes`) are
/// replaced wholesale when present in `data`.
pub fn merge_shallow(base: Value, data: &Map<String, Value>) -> Value {
    let mut merged = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in data {
        merged.insert(key.clone(), value.clone());
    }
    Value::Object(merged)
}

fn str_of(v: Option<&Value>) -> String {
    v.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn opt_str_of(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn bool_of(v: Option<&Value>) -> bool {
    v.and_then(Value::as_bool).unwrap_or(false)
}

/// Hour values arrive as numbers or numeric strings; empty string means unset.
fn hours_of(v: Option<&Value>) -> Option<f64> {
    match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub color: String,
    pub role: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
    pub skills: Vec<String>,
}

impl Person {
    fn normalize(&mut self) {
        if self.id.is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
        if self.color.is_empty() {
            self.color = PERSON_COLORS[0].to_string();
        }
    }
}

/// Site status: anything that is not explicitly `pending` reads as planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    #[default]
    Planned,
    Pending,
}

impl<'de> Deserialize<'de> for SiteStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        Ok(match v.as_str() {
            Some("pending") => Self::Pending,
            _ => Self::Planned,
        })
    }
}

/// Snapshot of the quote a site was planned from, carried on the site record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub status: SiteStatus,
    pub color: String,
    pub planning_weeks: Vec<String>,
    pub city: String,
    pub address: String,
    pub client_name: String,
    pub contact_name: String,
    pub contact_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_snapshot: Option<QuoteSnapshot>,
}

impl Site {
    fn normalize(&mut self) {
        if self.start_date.is_empty() {
            self.start_date = today_key();
        }
        if self.end_date.is_empty() {
            self.end_date = self.start_date.clone();
        }
        if self.id.is_empty() {
            let seed = if self.name.is_empty() {
                self.start_date.clone()
            } else {
                self.name.clone()
            };
            self.id = format!("site-{}-{}", seed, Uuid::new_v4());
        }
        if self.color.is_empty() {
            let idx = hash_string(&self.id) as usize % SITE_COLORS.len();
            self.color = SITE_COLORS[idx].to_string();
        }
        let snapshot_client = self
            .quote_snapshot
            .as_ref()
            .and_then(|q| q.client.clone())
            .unwrap_or_default();
        if self.client_name.is_empty() {
            self.client_name = snapshot_client.clone();
        }
        if self.contact_name.is_empty() {
            self.contact_name = if self.client_name.is_empty() {
                snapshot_client
            } else {
                self.client_name.clone()
            };
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub person_id: String,
    pub site_id: String,
    pub date: String,
    /// Fraction of a day (0.5 = half day). Absent means a full day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portion: Option<f64>,
    /// Explicit hours for the day, overriding `portion * hours_per_day`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
}

impl Assignment {
    /// The portion actually worked: invalid or missing values read as 1.
    pub fn effective_portion(&self) -> f64 {
        match self.portion {
            Some(p) if p.is_finite() && p > 0.0 => p,
            _ => 1.0,
        }
    }

    fn normalize(&mut self) {
        if self.id.is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
    }
}

/// A schedule cell annotation.
///
/// Stored either as a full object or, in legacy payloads, as a bare string
/// carrying just the text.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellNote {
    pub text: String,
    pub holiday: bool,
    pub blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    pub secondary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_override: Option<f64>,
}

impl CellNote {
    fn from_value(v: &Value) -> Self {
        if let Some(text) = v.as_str() {
            return Self {
                text: text.to_string(),
                ..Self::default()
            };
        }
        let Some(map) = v.as_object() else {
            return Self::default();
        };
        Self {
            text: str_of(map.get("text")),
            holiday: bool_of(map.get("holiday")),
            blocked: bool_of(map.get("blocked")),
            highlight: opt_str_of(map.get("highlight")),
            secondary: str_of(map.get("secondary")),
            hours_override: hours_of(map.get("hoursOverride")),
        }
    }
}

impl<'de> Deserialize<'de> for CellNote {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Todo,
    Draft,
    Pending,
    Won,
    Lost,
}

impl<'de> Deserialize<'de> for QuoteStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        Ok(match v.as_str() {
            Some("draft") => Self::Draft,
            Some("pending") => Self::Pending,
            Some("won") => Self::Won,
            Some("lost") => Self::Lost,
            _ => Self::Todo,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub status: QuoteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_end: Option<String>,
}

fn trimmed(v: &mut Option<String>) {
    if let Some(s) = v {
        let t = s.trim();
        if t.is_empty() {
            *v = None;
        } else if t.len() != s.len() {
            *v = Some(t.to_string());
        }
    }
}

impl Quote {
    fn normalize(&mut self) {
        if self.id.is_empty() {
            self.id = format!("quote-{}", Uuid::new_v4());
        }
        let title = self.title.trim();
        self.title = if title.is_empty() {
            "Nouveau devis".to_string()
        } else {
            title.to_string()
        };
        trimmed(&mut self.client);
        trimmed(&mut self.note);
        trimmed(&mut self.address);
        trimmed(&mut self.city);
        trimmed(&mut self.contact_name);
        trimmed(&mut self.contact_phone);
        if self.amount.map(|a| !a.is_finite()).unwrap_or(false) {
            self.amount = None;
        }
        if self.contact_name.is_none() {
            self.contact_name = self.client.clone();
        }
        // A planned window can't end before it starts (ISO date keys compare
        // lexicographically).
        if let (Some(start), Some(end)) = (&self.planned_start, &self.planned_end) {
            if end < start {
                self.planned_end = Some(start.clone());
            }
        }
        if matches!(self.status, QuoteStatus::Pending | QuoteStatus::Won) && self.sent_at.is_none()
        {
            self.sent_at = Some(today_key());
        }
        if self.status != QuoteStatus::Lost {
            self.reason = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventCalendar {
    pub id: String,
    pub name: String,
    pub color: String,
    pub visible: bool,
    pub is_default: bool,
}

impl Default for EventCalendar {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            color: String::new(),
            visible: true,
            is_default: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub calendar_id: String,
    pub title: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ============================================================================
// Document
// ============================================================================

/// The full planning state for one week key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerDocument {
    pub people: Vec<Person>,
    pub sites: Vec<Site>,
    pub assignments: Vec<Assignment>,
    pub notes: BTreeMap<String, CellNote>,
    pub absences_by_week: BTreeMap<String, BTreeMap<String, bool>>,
    pub quotes: Vec<Quote>,
    pub event_calendars: Vec<EventCalendar>,
    pub calendar_events: Vec<CalendarEvent>,
    pub site_week_visibility: BTreeMap<String, Vec<String>>,
    pub hours_per_day: f64,
    /// Logical timestamp: wall-clock ms at write time, 0 when never written.
    pub updated_at: u64,
    /// Session that produced the last write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl Default for PlannerDocument {
    fn default() -> Self {
        Self {
            people: Vec::new(),
            sites: Vec::new(),
            assignments: Vec::new(),
            notes: BTreeMap::new(),
            absences_by_week: BTreeMap::new(),
            quotes: Vec::new(),
            event_calendars: Vec::new(),
            calendar_events: Vec::new(),
            site_week_visibility: BTreeMap::new(),
            hours_per_day: 8.0,
            updated_at: 0,
            client_id: None,
        }
    }
}

fn record_list<T>(map: &Map<String, Value>, key: &str) -> Vec<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match map.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| serde_json::from_value(v.clone()).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    }
}

fn map_field<T>(map: &Map<String, Value>, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    map.get(key)
        .map(|v| serde_json::from_value(v.clone()).unwrap_or_default())
        .unwrap_or_default()
}

impl PlannerDocument {
    /// Decode a raw JSON value, falling back to defaults field by field.
    ///
    /// Never fails: a `null`, a string, or a document with one mangled field
    /// all produce a usable document.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        let updated_at = timestamp_of(&Value::Object(map.clone()));
        Self {
            people: record_list(&map, "people"),
            sites: record_list(&map, "sites"),
            assignments: record_list(&map, "assignments"),
            notes: map_field(&map, "notes"),
            absences_by_week: map_field(&map, "absencesByWeek"),
            quotes: record_list(&map, "quotes"),
            event_calendars: record_list(&map, "eventCalendars"),
            calendar_events: record_list(&map, "calendarEvents"),
            site_week_visibility: map_field(&map, "siteWeekVisibility"),
            hours_per_day: map
                .get("hoursPerDay")
                .and_then(Value::as_f64)
                .filter(|h| h.is_finite())
                .unwrap_or(8.0),
            updated_at,
            client_id: map
                .get("clientId")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Fill generated ids and default colors, clamp date windows, and apply
    /// the quote status bookkeeping rules.
    pub fn normalize(&mut self) {
        for p in &mut self.people {
            p.normalize();
        }
        for s in &mut self.sites {
            s.normalize();
        }
        for a in &mut self.assignments {
            a.normalize();
        }
        for q in &mut self.quotes {
            q.normalize();
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Whether a site is visible on a given week. An empty or missing
    /// selection means the site shows on every week.
    pub fn site_visible_on_week(&self, site_id: &str, week_key: &str) -> bool {
        match self.site_week_visibility.get(site_id) {
            Some(selection) if !selection.is_empty() => selection.iter().any(|wk| wk == week_key),
            _ => true,
        }
    }
}

impl<'de> Deserialize<'de> for PlannerDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        Ok(Self::from_value(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cell_key_format() {
        assert_eq!(cell_key("s42", "2025-11-05"), "s42|2025-11-05");
    }

    #[test]
    fn timestamp_reads_numbers_and_strings() {
        assert_eq!(timestamp_of(&json!({"updatedAt": 1000})), 1000);
        assert_eq!(timestamp_of(&json!({"updatedAt": "1000"})), 1000);
        assert_eq!(timestamp_of(&json!({"updatedAt": 0})), 0);
        assert_eq!(timestamp_of(&json!({"updatedAt": -5})), 0);
        assert_eq!(timestamp_of(&json!({"updatedAt": "junk"})), 0);
        assert_eq!(timestamp_of(&json!({})), 0);
    }

    #[test]
    fn has_payload_requires_a_core_array() {
        assert!(has_payload(&json!({"people": []})));
        assert!(has_payload(&json!({"sites": [], "updatedAt": 3})));
        assert!(has_payload(&json!({"assignments": []})));
        assert!(!has_payload(&json!({"updatedAt": 1000})));
        assert!(!has_payload(&json!({"people": "nope"})));
        assert!(!has_payload(&json!(null)));
        assert!(!has_payload(&json!("text")));
    }

    #[test]
    fn merge_shallow_replaces_only_named_keys() {
        let base = json!({"people": [{"id": "p1"}], "hoursPerDay": 7, "notes": {"a|b": "x"}});
        let data = json!({"notes": {"c|d": "y"}}).as_object().cloned().unwrap();
        let merged = merge_shallow(base, &data);
        assert_eq!(merged["hoursPerDay"], 7);
        assert_eq!(merged["people"][0]["id"], "p1");
        // Nested maps are replaced wholesale, not deep-merged.
        assert!(merged["notes"].get("a|b").is_none());
        assert_eq!(merged["notes"]["c|d"], "y");
    }

    #[test]
    fn from_value_survives_garbage() {
        assert_eq!(
            PlannerDocument::from_value(json!(null)),
            PlannerDocument::default()
        );
        assert_eq!(PlannerDocument::from_value(json!("text")).hours_per_day, 8.0);

        let doc = PlannerDocument::from_value(json!({
            "people": "not-an-array",
            "sites": [{"id": "s1", "name": "Chantier A"}],
            "hoursPerDay": "bad",
            "updatedAt": 1234,
        }));
        assert!(doc.people.is_empty());
        assert_eq!(doc.sites.len(), 1);
        assert_eq!(doc.hours_per_day, 8.0);
        assert_eq!(doc.updated_at, 1234);
    }

    #[test]
    fn legacy_string_notes_decode_as_text() {
        let doc = PlannerDocument::from_value(json!({
            "people": [],
            "notes": {"s1|2025-01-06": "Juste une note"},
        }));
        let note = &doc.notes["s1|2025-01-06"];
        assert_eq!(note.text, "Juste une note");
        assert!(!note.holiday);
    }

    #[test]
    fn cell_note_coerces_hours_override() {
        let n = CellNote::from_value(&json!({"text": "t", "hoursOverride": "6"}));
        assert_eq!(n.hours_override, Some(6.0));
        let n = CellNote::from_value(&json!({"hoursOverride": ""}));
        assert_eq!(n.hours_override, None);
        let n = CellNote::from_value(&json!({"hoursOverride": 7.5}));
        assert_eq!(n.hours_override, Some(7.5));
    }

    #[test]
    fn unknown_statuses_normalize_to_defaults() {
        let doc = PlannerDocument::from_value(json!({
            "sites": [{"id": "s1", "status": "bizarre"}],
            "quotes": [{"id": "q1", "status": "unknown"}],
        }));
        assert_eq!(doc.sites[0].status, SiteStatus::Planned);
        assert_eq!(doc.quotes[0].status, QuoteStatus::Todo);
    }

    #[test]
    fn site_normalization_fills_dates_and_color() {
        let mut doc = PlannerDocument::from_value(json!({
            "sites": [{"id": "s1", "name": "A", "startDate": "2025-03-03"}],
        }));
        doc.normalize();
        let site = &doc.sites[0];
        assert_eq!(site.end_date, "2025-03-03");
        // Same id always hashes to the same color.
        let idx = hash_string("s1") as usize % SITE_COLORS.len();
        assert_eq!(site.color, SITE_COLORS[idx]);
    }

    #[test]
    fn quote_normalization_rules() {
        let mut doc = PlannerDocument::from_value(json!({
            "quotes": [
                {"id": "q1", "title": "  ", "status": "pending",
                 "plannedStart": "2025-05-10", "plannedEnd": "2025-05-01"},
                {"id": "q2", "title": "Refus", "status": "won", "reason": "trop cher"},
            ],
        }));
        doc.normalize();
        let q1 = &doc.quotes[0];
        assert_eq!(q1.title, "Nouveau devis");
        assert_eq!(q1.planned_end.as_deref(), Some("2025-05-10"));
        assert!(q1.sent_at.is_some(), "pending quotes get a sent date");
        // reason only survives on lost quotes
        assert_eq!(doc.quotes[1].reason, None);
    }

    #[test]
    fn assignment_portion_defaults() {
        let a = Assignment {
            portion: Some(0.5),
            ..Assignment::default()
        };
        assert_eq!(a.effective_portion(), 0.5);
        let a = Assignment {
            portion: Some(-2.0),
            ..Assignment::default()
        };
        assert_eq!(a.effective_portion(), 1.0);
        assert_eq!(Assignment::default().effective_portion(), 1.0);
    }

    #[test]
    fn site_visibility_defaults_to_all_weeks() {
        let mut doc = PlannerDocument::default();
        assert!(doc.site_visible_on_week("unknown", "2025-W10"));
        doc.site_week_visibility
            .insert("s1".into(), vec!["2025-W02".into(), "2025-W03".into()]);
        assert!(doc.site_visible_on_week("s1", "2025-W02"));
        assert!(!doc.site_visible_on_week("s1", "2025-W04"));
        doc.site_week_visibility.insert("s2".into(), vec![]);
        assert!(doc.site_visible_on_week("s2", "2025-W04"));
    }

    #[test]
    fn serialization_round_trip_keeps_camel_case() {
        let mut doc = PlannerDocument::default();
        doc.people.push(Person {
            id: "p1".into(),
            name: "Ali".into(),
            ..Person::default()
        });
        doc.updated_at = 42;
        doc.client_id = Some("session".into());

        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["updatedAt"], 42);
        assert_eq!(v["clientId"], "session");
        assert_eq!(v["hoursPerDay"], 8.0);
        assert_eq!(v["absencesByWeek"], json!({}));

        let back = PlannerDocument::from_value(v);
        assert_eq!(back, doc);
    }
}
