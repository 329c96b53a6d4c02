//! Minimal behavior tree runtime
//!
//! Nodes are ticked cooperatively: `Running` means "call me again next tick",
//! it never blocks. Composite nodes keep their own cursor between ticks.

/// Result of ticking a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Success,
    Failure,
}

/// A tickable behavior over a context `C`
pub trait Behavior<C> {
    fn tick(&mut self, ctx: &mut C, dt: f32) -> Status;
}

pub type BoxedBehavior<C> = Box<dyn Behavior<C>>;

/// Runs children in order, resuming at the child that last returned `Running`
pub struct Sequence<C> {
    children: Vec<BoxedBehavior<C>>,
    cursor: usize,
}

impl<C> Sequence<C> {
    pub fn new(children: Vec<BoxedBehavior<C>>) -> Self {
        Self { children, cursor: 0 }
    }

    /// Index of the child that will be ticked next
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&mut self, ctx: &mut C, dt: f32) -> Status {
        while self.cursor < self.children.len() {
            match self.children[self.cursor].tick(ctx, dt) {
                Status::Running => return Status::Running,
                Status::Failure => {
                    self.cursor = 0;
                    return Status::Failure;
                }
                Status::Success => self.cursor += 1,
            }
        }
        self.cursor = 0;
        Status::Success
    }
}

/// Reports the first child's `Running`/`Success` and stops at the first
/// `Failure` without trying later children
pub struct Selector<C> {
    children: Vec<BoxedBehavior<C>>,
}

impl<C> Selector<C> {
    pub fn new(children: Vec<BoxedBehavior<C>>) -> Self {
        Self { children }
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&mut self, ctx: &mut C, dt: f32) -> Status {
        match self.children.first_mut() {
            Some(child) => child.tick(ctx, dt),
            None => Status::Failure,
        }
    }
}

/// Holds the tree for `duration` seconds, then succeeds and rearms
#[derive(Debug, Clone)]
pub struct Wait {
    duration: f32,
    left: f32,
}

impl Wait {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            left: duration,
        }
    }
}

impl<C> Behavior<C> for Wait {
    fn tick(&mut self, _ctx: &mut C, dt: f32) -> Status {
        self.left -= dt;
        if self.left > 0.0 {
            return Status::Running;
        }
        self.left = self.duration;
        Status::Success
    }
}

/// Leaf wrapping a closure over the context
pub struct Action<F> {
    f: F,
}

impl<F> Action<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<C, F> Behavior<C> for Action<F>
where
    F: FnMut(&mut C, f32) -> Status,
{
    fn tick(&mut self, ctx: &mut C, dt: f32) -> Status {
        (self.f)(ctx, dt)
    }
}

/// Box a closure as an action node
pub fn action<C, F>(f: F) -> BoxedBehavior<C>
where
    C: 'static,
    F: FnMut(&mut C, f32) -> Status + 'static,
{
    Box::new(Action::new(f))
}

/// Box a wait node
pub fn wait<C: 'static>(duration: f32) -> BoxedBehavior<C> {
    Box::new(Wait::new(duration))
}
