use crate::domain::{ThreatEvent, ThreatTypeMaster};
use crate::ingest::same_key;

/// Fill the master-data fields of `event` from the threat type table.
///
/// The type code is matched against master codes first and master names second, since some
/// feeds put the display name in the code column. A miss leaves the fields untouched.
pub fn hydrate_threat_event(event: &mut ThreatEvent, master: &[ThreatTypeMaster]) -> bool {
    let Some(code) = event.threat_type_code.as_deref() else {
        return false;
    };

    let found = master
        .iter()
        .find(|entry| same_key(&entry.code, code))
        .or_else(|| {
            master.iter().find(|entry| {
                entry
                    .name
                    .as_deref()
                    .map(|name| same_key(name, code))
                    .unwrap_or(false)
            })
        });

    let Some(entry) = found else {
        return false;
    };

    event.threat_name = entry.name.clone();
    event.threat_description = entry.description.clone();
    event.threat_keywords = entry.keywords.clone();
    event.threat_severity = entry.severity.clone();
    true
}
