/// Built-in help registry for the terminal's entry codes.
use crate::types::{CommandCategory, HelpEntry};

fn entry(
    code: &str,
    category: CommandCategory,
    summary: &str,
    usage: &str,
    example: &str,
) -> HelpEntry {
    HelpEntry {
        code: code.to_string(),
        category,
        summary: summary.to_string(),
        usage: usage.to_string(),
        example: example.to_string(),
    }
}

/// Every documented entry, grouped by category in display order.
pub fn builtin_help() -> Vec<HelpEntry> {
    use CommandCategory::*;
    vec![
        entry("JI", Session, "SIGN IN", "JI[AGENT][/OFFICE]", "JI1234AA/DEL1A"),
        entry("JO", Session, "SIGN OUT", "JO", "JO"),
        entry("AN", Availability, "AVAILABILITY", "AN[DDMMM]ORGDST", "AN12JANDELDOH"),
        entry("AD", Availability, "DIRECT FLIGHTS ONLY", "AD[DDMMM]ORGDST", "AD12JANDELLHR"),
        entry("SN", Availability, "SCHEDULE", "SN[DDMMM]ORGDST", "SN12JANBOMATH"),
        entry("SD", Availability, "DIRECT SCHEDULE", "SD[DDMMM]ORGDST", "SD12JANBOMATH"),
        entry("MD", Availability, "MOVE DOWN", "MD", "MD"),
        entry("MU", Availability, "MOVE UP", "MU", "MU"),
        entry("MT", Availability, "MOVE TO TOP", "MT", "MT"),
        entry("MB", Availability, "MOVE TO BOTTOM", "MB", "MB"),
        entry("MN", Availability, "NEXT DAY", "MN", "MN"),
        entry("MY", Availability, "PREVIOUS DAY", "MY", "MY"),
        entry("AC", Availability, "CHANGE DATE", "ACDDMMM", "AC15JAN"),
        entry("SS", Booking, "SELL SEATS", "SS{SEATS}{CLASS}{LINE}", "SS1Y1"),
        entry("NN", Booking, "NEED SEATS", "NN{SEATS}{CLASS}{LINE}", "NN2M3"),
        entry("RR", Booking, "RECONFIRM SEGMENT", "RR{SEATS}{CLASS}{SEGMENT}", "RR1Y1"),
        entry("XE", Booking, "CANCEL SEGMENT", "XE{SEGMENT}", "XE2"),
        entry("XI", Booking, "CANCEL ITINERARY", "XI", "XI"),
        entry("NM", Elements, "NAME ELEMENT", "NM{COUNT}{SURNAME}/{GIVEN} [TITLE][(CHD|INF)]", "NM1KUMAR/RAHUL MR"),
        entry("XN", Elements, "CANCEL NAME", "XN{NAME}", "XN1"),
        entry("AP", Elements, "CONTACT ELEMENT", "AP {TEXT}", "AP DEL 9876543210"),
        entry("TK", Elements, "TICKETING ARRANGEMENT", "TK{OK|TLDDMMM}", "TK OK"),
        entry("SR", Elements, "SPECIAL SERVICE REQUEST", "SR {TEXT}", "SR VGML"),
        entry("ST", Elements, "SEAT REQUEST", "ST/{ROW}{SEAT}[/S{SEGMENT}]", "ST/12A/S1"),
        entry("SM", Elements, "SEAT MAP", "SM[SEGMENT]", "SM1"),
        entry("OSI", Elements, "OTHER SERVICE INFO", "OSI {TEXT}", "OSI AI VIP"),
        entry("RM", Elements, "REMARK", "RM {TEXT}", "RM CALL PAX"),
        entry("RC", Elements, "RECEIVED FROM", "RC[ NAME]", "RC PAX"),
        entry("FQD", Pricing, "FARE DISPLAY", "FQD{ORG}{DST}", "FQDDELDOH"),
        entry("FXP", Pricing, "PRICE ITINERARY", "FXP[/OPTIONS]", "FXP"),
        entry("FXB", Pricing, "PRICE AND REBOOK", "FXB", "FXB"),
        entry("TTP", Pricing, "ISSUE TICKET", "TTP[/OPTIONS]", "TTP"),
        entry("TWD", Pricing, "DISPLAY TICKETS", "TWD", "TWD"),
        entry("ER", Pnr, "END AND RETRIEVE", "ER", "ER"),
        entry("ET", Pnr, "END TRANSACTION", "ET", "ET"),
        entry("RT", Pnr, "RETRIEVE PNR", "RT[LOCATOR]", "RT ABC234"),
        entry("IG", Pnr, "IGNORE", "IG", "IG"),
        entry("IR", Pnr, "IGNORE AND RETRIEVE", "IR", "IR"),
        entry("SP", Pnr, "SPLIT PNR", "SP{NAME}", "SP2"),
        entry("RH", Pnr, "PNR HISTORY", "RH|RHA", "RHA"),
        entry("QS", Queue, "START QUEUE", "QS", "QS"),
        entry("QD", Queue, "DISPLAY QUEUE", "QD", "QD"),
        entry("QE", Queue, "EXIT QUEUE", "QE", "QE"),
        entry("HE", Help, "HELP", "HE [CODE]", "HE SS"),
    ]
}

pub struct HelpRegistry {
    entries: Vec<HelpEntry>,
}

impl HelpRegistry {
    pub fn new() -> Self {
        Self { entries: builtin_help() }
    }

    /// Look up a code, also accepting the bare two-letter form of a longer code (`FQ` for `FQD`).
    pub fn find(&self, topic: &str) -> Option<&HelpEntry> {
        let topic = topic.trim();
        self.entries
            .iter()
            .find(|e| e.code == topic)
            .or_else(|| self.entries.iter().find(|e| e.code.starts_with(topic) && topic.len() >= 2))
    }

    /// The full command summary shown for `HE`.
    pub fn overview(&self) -> String {
        let mut lines = vec!["ASMODEUS COMMANDS:".to_string()];
        let mut current = None;
        for e in &self.entries {
            if current != Some(e.category) {
                lines.push(format!("-- {} --", e.category.title()));
                current = Some(e.category);
            }
            lines.push(format!("{:<5} {}", e.code, e.summary));
        }
        lines.push("HE {CODE} FOR DETAILS".to_string());
        lines.join("\n")
    }

    pub fn describe(&self, entry: &HelpEntry) -> String {
        format!(
            "{} - {}\nFORMAT:  {}\nEXAMPLE: {}",
            entry.code, entry.summary, entry.usage, entry.example
        )
    }
}

impl Default for HelpRegistry {
    fn default() -> Self {
        Self::new()
    }
}
