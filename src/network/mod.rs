pub mod feed;

pub use feed::*;

/*
    Delivery in the model is point-to-point, reliable, and instantaneous
    relative to decision computation: a recipient holds a message the
    moment its sender emits it, and every send of a round lands before
    any decision is read. "Broadcast" means the sender hands the same
    point-to-point message to every other participant. The traitor is
    the one participant allowed to break exactly that rule.
*/
