use std::cell::RefCell;
use std::rc::Rc;

/// ## Drawing surface
///
/// What the interpreters draw on. A GUI backs this with a real canvas;
/// headless runs use [`Headless`].

pub trait Canvas {
    fn forward(&mut self, distance: f64);
    fn turn(&mut self, degrees: f64);
    fn set_xy(&mut self, x: f64, y: f64);
    fn set_heading(&mut self, heading: f64);
    fn set_color(&mut self, name: &str);
    fn set_pen_size(&mut self, size: f64);
    fn pen_up(&mut self);
    fn pen_down(&mut self);
    fn circle(&mut self, radius: f64);
    fn clear_screen(&mut self);
    fn home(&mut self);
    fn set_visible(&mut self, visible: bool);
}

/// Draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Canvas for Headless {
    fn forward(&mut self, _distance: f64) {}
    fn turn(&mut self, _degrees: f64) {}
    fn set_xy(&mut self, _x: f64, _y: f64) {}
    fn set_heading(&mut self, _heading: f64) {}
    fn set_color(&mut self, _name: &str) {}
    fn set_pen_size(&mut self, _size: f64) {}
    fn pen_up(&mut self) {}
    fn pen_down(&mut self) {}
    fn circle(&mut self, _radius: f64) {}
    fn clear_screen(&mut self) {}
    fn home(&mut self) {}
    fn set_visible(&mut self, _visible: bool) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurtleCall {
    Forward(f64),
    Turn(f64),
    SetXY(f64, f64),
    SetHeading(f64),
    SetColor(String),
    SetPenSize(f64),
    PenUp,
    PenDown,
    Circle(f64),
    ClearScreen,
    Home,
    SetVisible(bool),
}

/// Canvas that remembers every call. Clones share the same log so a test
/// can keep one handle while the runtime owns another.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<TurtleCall>>>,
}

impl Recorder {
    pub fn new() -> Recorder {
        Recorder::default()
    }

    pub fn calls(&self) -> Vec<TurtleCall> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear()
    }

    fn record(&mut self, call: TurtleCall) {
        self.calls.borrow_mut().push(call)
    }
}

impl Canvas for Recorder {
    fn forward(&mut self, distance: f64) {
        self.record(TurtleCall::Forward(distance))
    }
    fn turn(&mut self, degrees: f64) {
        self.record(TurtleCall::Turn(degrees))
    }
    fn set_xy(&mut self, x: f64, y: f64) {
        self.record(TurtleCall::SetXY(x, y))
    }
    fn set_heading(&mut self, heading: f64) {
        self.record(TurtleCall::SetHeading(heading))
    }
    fn set_color(&mut self, name: &str) {
        self.record(TurtleCall::SetColor(name.to_string()))
    }
    fn set_pen_size(&mut self, size: f64) {
        self.record(TurtleCall::SetPenSize(size))
    }
    fn pen_up(&mut self) {
        self.record(TurtleCall::PenUp)
    }
    fn pen_down(&mut self) {
        self.record(TurtleCall::PenDown)
    }
    fn circle(&mut self, radius: f64) {
        self.record(TurtleCall::Circle(radius))
    }
    fn clear_screen(&mut self) {
        self.record(TurtleCall::ClearScreen)
    }
    fn home(&mut self) {
        self.record(TurtleCall::Home)
    }
    fn set_visible(&mut self, visible: bool) {
        self.record(TurtleCall::SetVisible(visible))
    }
}

/// Turtle position and pen. Heading 0 points up the y axis and grows
/// clockwise, so `turn(90)` faces +x.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub pen_down: bool,
    pub pen_color: String,
    pub pen_size: f64,
    pub visible: bool,
}

impl Default for Pose {
    fn default() -> Pose {
        Pose {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            pen_down: true,
            pen_color: "black".to_string(),
            pen_size: 1.0,
            visible: true,
        }
    }
}

fn normalize(degrees: f64) -> f64 {
    let h = degrees % 360.0;
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// Facade the executors drive: keeps the pose and forwards to the canvas.
pub struct Turtle {
    pose: Pose,
    canvas: Box<dyn Canvas>,
}

impl Turtle {
    pub fn new(canvas: Box<dyn Canvas>) -> Turtle {
        Turtle {
            pose: Pose::default(),
            canvas,
        }
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Back to the start pose without touching the canvas.
    pub fn reset(&mut self) {
        self.pose = Pose::default();
    }

    pub fn forward(&mut self, distance: f64) {
        let rad = self.pose.heading.to_radians();
        self.pose.x += distance * rad.sin();
        self.pose.y += distance * rad.cos();
        self.canvas.forward(distance);
    }

    pub fn back(&mut self, distance: f64) {
        self.forward(-distance)
    }

    pub fn turn(&mut self, degrees: f64) {
        self.pose.heading = normalize(self.pose.heading + degrees);
        self.canvas.turn(degrees);
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.pose.x = x;
        self.pose.y = y;
        self.canvas.set_xy(x, y);
    }

    pub fn set_heading(&mut self, heading: f64) {
        self.pose.heading = normalize(heading);
        self.canvas.set_heading(self.pose.heading);
    }

    pub fn set_color(&mut self, name: &str) {
        self.pose.pen_color = name.to_string();
        self.canvas.set_color(name);
    }

    pub fn set_pen_size(&mut self, size: f64) {
        self.pose.pen_size = size;
        self.canvas.set_pen_size(size);
    }

    pub fn pen_up(&mut self) {
        self.pose.pen_down = false;
        self.canvas.pen_up();
    }

    pub fn pen_down(&mut self) {
        self.pose.pen_down = true;
        self.canvas.pen_down();
    }

    pub fn circle(&mut self, radius: f64) {
        self.canvas.circle(radius);
    }

    pub fn home(&mut self) {
        self.pose.x = 0.0;
        self.pose.y = 0.0;
        self.pose.heading = 0.0;
        self.canvas.home();
    }

    pub fn clear_screen(&mut self) {
        self.pose = Pose::default();
        self.canvas.clear_screen();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.pose.visible = visible;
        self.canvas.set_visible(visible);
    }
}

impl Default for Turtle {
    fn default() -> Turtle {
        Turtle::new(Box::new(Headless))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_returns_home() {
        let rec = Recorder::new();
        let mut t = Turtle::new(Box::new(rec.clone()));
        for _ in 0..4 {
            t.forward(50.0);
            t.turn(90.0);
        }
        assert!(t.pose().x.abs() < 1e-9);
        assert!(t.pose().y.abs() < 1e-9);
        assert_eq!(t.pose().heading, 0.0);
        assert_eq!(rec.calls().len(), 8);
        assert_eq!(rec.calls()[0], TurtleCall::Forward(50.0));
    }

    #[test]
    fn test_heading_wraps() {
        let mut t = Turtle::default();
        t.turn(-90.0);
        assert_eq!(t.pose().heading, 270.0);
        t.forward(10.0);
        assert!((t.pose().x + 10.0).abs() < 1e-9);
        t.clear_screen();
        assert_eq!(t.pose(), &Pose::default());
    }
}
