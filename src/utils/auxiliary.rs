use std::{cell::RefCell, rc::Rc};

pub type SharableRef<T> = Rc<RefCell<T>>;

pub trait SharableRefExt<T> {
    fn new_sharable(inner: T) -> SharableRef<T>;
}

impl<T> SharableRefExt<T> for SharableRef<T> {
    fn new_sharable(inner: T) -> SharableRef<T> {
        Rc::new(RefCell::new(inner))
    }
}
