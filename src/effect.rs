use crate::catalog::Region;
use crate::session::PageRequest;
use crate::state::Record;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadPage(PageRequest),
    Search {
        ticket: u64,
        query: String,
        region: Region,
    },
    ResolveEvolution { record: Record },
}
