use crate::config::AntiWindup;

// ---------------------------------------------------------------------------
// PID controller (single axis, rate feedback)
// ---------------------------------------------------------------------------

/// PID with the derivative taken from a measured rate instead of a finite
/// difference of the error, so a wrapped error never produces a derivative kick.
#[derive(Debug, Clone)]
pub struct Pid {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub limit: Option<f64>,
    pub anti_windup: AntiWindup,
    integral: f64,
    last_out: f64,
    saturated: bool,
}

impl Pid {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            limit: None,
            anti_windup: AntiWindup::None,
            integral: 0.0,
            last_out: 0.0,
            saturated: false,
        }
    }

    pub fn with_limit(mut self, limit: Option<f64>, anti_windup: AntiWindup) -> Self {
        self.limit = limit;
        self.anti_windup = anti_windup;
        self
    }

    /// `kp * error + ki * integral - kd * rate`, clamped to the limit if one is set.
    pub fn update(&mut self, error: f64, rate: f64, dt: f64) -> f64 {
        let hold = match self.anti_windup {
            AntiWindup::None => false,
            // Previous output was clamped and this error would push it further out.
            AntiWindup::Conditional => self.saturated && self.last_sign() == error.signum(),
        };
        if !hold {
            self.integral += error * dt;
        }

        let raw = self.kp * error + self.ki * self.integral - self.kd * rate;
        match self.limit {
            Some(limit) => {
                let out = raw.clamp(-limit, limit);
                self.saturated = out != raw;
                self.last_out = out;
                out
            }
            None => {
                self.saturated = false;
                self.last_out = raw;
                raw
            }
        }
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.saturated = false;
        self.last_out = 0.0;
    }

    fn last_sign(&self) -> f64 {
        self.last_out.signum()
    }
}
