pub mod calendar;
pub mod clock;
pub mod error;
pub mod intent;
pub mod session;
pub mod traits;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::Rejection;
pub use intent::{CommandIntent, CommandKind};
pub use session::{AgentQueue, AvailabilityResults, SearchMode, SearchQuery, Session, WorkingArea};
pub use traits::PersistenceGateway;
pub use types::{
    BookingClass, FlightSegment, GeneratedFlight, HistoryEntry, IssuedTicket, PaxFare, PaxType, Passenger,
    PnrSnapshot, PricedFare, SegmentAction, TicketRecord, CLASS_PRIORITY,
};
