use thiserror::Error;

/// A command the terminal refuses. The display text is exactly what the agent sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("SECURED AREA - PLEASE SIGN IN")]
    SecuredArea,

    #[error("ALREADY SIGNED IN")]
    AlreadySignedIn,

    #[error("CHECK ENTRY")]
    CheckEntry,

    // Availability and paging
    #[error("NO AVAILABILITY IN WORKING AREA")]
    NoAvailability,

    #[error("NO FLIGHTS FOUND FOR {origin} -> {destination}")]
    NoFlights { origin: String, destination: String },

    #[error("INVALID DATE")]
    InvalidDate,

    #[error("TOP OF LIST")]
    TopOfList,

    #[error("LAST PAGE")]
    LastPage,

    // Sell / need / reconfirm
    #[error("INVALID LINE NUMBER")]
    InvalidLine,

    #[error("INVALID CLASS")]
    InvalidClass,

    #[error("NO SEATS AVAILABLE")]
    NoSeats,

    #[error("INVALID NUMBER OF SEATS")]
    InvalidSeatCount,

    // Itinerary and names
    #[error("NO ITIN")]
    NoItinerary,

    #[error("INVALID SEGMENT NUMBER")]
    InvalidSegment,

    #[error("NO NAMES")]
    NoNames,

    #[error("INVALID NAME NUMBER")]
    InvalidNameNumber,

    #[error("INVALID NAME FORMAT")]
    InvalidNameFormat,

    #[error("INVALID SEAT")]
    InvalidSeat,

    // End of transaction
    #[error("NEED NAME FIELD")]
    NeedName,

    #[error("NEED CONTACT ELEMENT")]
    NeedContact,

    #[error("NEED TICKETING ARRANGEMENT")]
    NeedTicketing,

    #[error("PNR NOT PRICED")]
    NotPriced,

    #[error("NO TICKETS ISSUED")]
    NoTickets,

    // Retrieval
    #[error("NO PNR IN CONTEXT")]
    NoPnr,

    #[error("PNR {0} NOT FOUND")]
    PnrNotFound(String),

    #[error("UNABLE TO RETRIEVE {0} - RETRY LATER")]
    RetrieveUnavailable(String),

    #[error("SPLIT REQUIRES AT LEAST 2 NAMES")]
    SplitNeedsTwo,

    #[error("NO HISTORY AVAILABLE")]
    NoHistory,

    // Queue
    #[error("NOT IN QUEUE MODE")]
    NotInQueue,

    #[error("QUEUE EMPTY")]
    QueueEmpty,

    #[error("NO HELP AVAILABLE FOR {0}")]
    NoHelp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_terminal_text() {
        assert_eq!(Rejection::NoItinerary.to_string(), "NO ITIN");
        assert_eq!(
            Rejection::PnrNotFound("ABC234".into()).to_string(),
            "PNR ABC234 NOT FOUND"
        );
        assert_eq!(
            Rejection::NoFlights { origin: "DEL".into(), destination: "DOH".into() }.to_string(),
            "NO FLIGHTS FOUND FOR DEL -> DOH"
        );
    }
}
