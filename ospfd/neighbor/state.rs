#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NeighborState {
    Down,
    Attempt,
    Init,
    TwoWay,
    ExStart,
    Exchange,
    Loading,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborEvent {
    HelloReceived,
    TwoWayReceived,
    NegotiationDone,
    ExchangeDone,
    BadLSReq,
    LoadingDone,
    AdjOk,
    SeqNumberMismatch,
    OneWayReceived,
    KillNbr,
    InactivityTimer,
    LLDown,
}

/// Facts about the neighbor and its interface that some transitions
/// depend on.
#[derive(Debug, Clone, Copy, Default)]
pub struct Conditions {
    /// Whether an adjacency should be formed with the neighbor.
    pub adjacency_ok: bool,
    pub request_list_empty: bool,
}

impl NeighborState {
    /// State the neighbor moves to on `event`, or `None` when the event is
    /// not expected in the current state and must be ignored.
    pub fn next(self, event: NeighborEvent, cond: Conditions) -> Option<NeighborState> {
        use NeighborEvent::*;
        use NeighborState::*;

        let adjacency = if cond.adjacency_ok { ExStart } else { TwoWay };
        match (event, self) {
            (HelloReceived, Down | Attempt) => Some(Init),
            (HelloReceived, state) => Some(state),
            (TwoWayReceived, Init) => Some(adjacency),
            (TwoWayReceived, state) if state >= TwoWay => Some(state),
            (NegotiationDone, ExStart) => Some(Exchange),
            (ExchangeDone, Exchange) if cond.request_list_empty => Some(Full),
            (ExchangeDone, Exchange) => Some(Loading),
            (BadLSReq | SeqNumberMismatch, state) if state >= Exchange => Some(ExStart),
            (LoadingDone, Loading) => Some(Full),
            (AdjOk, TwoWay) => Some(adjacency),
            (AdjOk, state) if state >= ExStart && !cond.adjacency_ok => Some(TwoWay),
            (AdjOk, state) if state >= ExStart => Some(state),
            (OneWayReceived, state) if state >= TwoWay => Some(Init),
            (OneWayReceived, Init) => Some(Init),
            (KillNbr | InactivityTimer | LLDown, _) => Some(Down),
            _ => None,
        }
    }
}
