/// Something that reacts to a stream of events, typically a projection
/// kept in sync with the engine.
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}
