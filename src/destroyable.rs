// implemented where an Rc cycle through a channel subscription has to be broken by hand
pub trait Destroyable {
    fn destroy(&mut self);
}
