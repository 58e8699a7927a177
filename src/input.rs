//! Per-tick input as the host sees it.

/// Held state of each control this tick. `fire` and `pause` act on the
/// rising edge only, so holding them down does nothing extra.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub pause: bool,
}

impl InputSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn firing() -> Self {
        Self {
            fire: true,
            ..Self::default()
        }
    }

    /// Unit-length movement vector (y down); diagonals are normalised and
    /// opposing keys cancel.
    pub fn direction(&self) -> (f32, f32) {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        let dx = axis(self.left, self.right);
        let dy = axis(self.up, self.down);
        if dx != 0.0 && dy != 0.0 {
            let inv = std::f32::consts::FRAC_1_SQRT_2;
            (dx * inv, dy * inv)
        } else {
            (dx, dy)
        }
    }
}
