use crate::frame::Frame;

/// Renderer-agnostic interface. A renderer turns a composed frame into some
/// output; it never sees the locks or the live universe.
pub trait Renderer {
    type Output;

    fn render(&self, frame: &Frame) -> Self::Output;
}

/// Plain-text renderer used by the console `view` command and the text
/// surface. Values are printed in internal units.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &Frame) -> String {
        let mut out = String::new();
        let camera = &frame.camera;
        let p = camera.position();
        let a = camera.angles();
        out.push_str(&format!(
            "=== Frame (tick={}, t={:.3} s) ===\n",
            frame.tick, frame.elapsed
        ));
        out.push_str(&format!("Bodies: {}\n", frame.bodies.len()));
        out.push_str(&format!(
            "Camera: pos=({:.4e}, {:.4e}, {:.4e}) angles=({:.1}, {:.1}, {:.1})",
            p.x, p.y, p.z, a.theta, a.phi, a.psi
        ));
        match camera.locked_body() {
            Some(name) => out.push_str(&format!(
                " locked={name} distance={:.4e}\n",
                camera.lock_distance()
            )),
            None => out.push('\n'),
        }
        match frame.light {
            Some(l) => out.push_str(&format!("Light: ({:.4e}, {:.4e}, {:.4e})\n", l.x, l.y, l.z)),
            None => out.push_str("Light: none\n"),
        }
        for (name, body) in &frame.bodies {
            let q = body.position;
            out.push_str(&format!(
                "  {name:<12} pos=({:.4e}, {:.4e}, {:.4e}) speed={:.4e} r={:.4e} m={:.4e}\n",
                q.x,
                q.y,
                q.z,
                body.speed(),
                body.radius,
                body.mass
            ));
        }
        out
    }
}
