use crate::{Trace, TraceLevel};

impl Trace {
    pub fn new(level: TraceLevel) -> Self {
        Self {
            level,
            path: Vec::new(),
        }
    }

    /// Derive the trace handed to a child parser. The path is only maintained
    /// when tracing is enabled.
    pub fn extend(&self, node_type: &'static str) -> Trace {
        if self.level == TraceLevel::Off {
            return Trace {
                level: self.level,
                path: Vec::new(),
            };
        }

        let mut path = self.path.clone();
        path.push(node_type);
        Trace {
            level: self.level,
            path,
        }
    }

    pub fn out<TF: FnOnce() -> String>(&self, message: TF) {
        self.emit(TraceLevel::On, message);
    }

    pub fn debug<TF: FnOnce() -> String>(&self, message: TF) {
        self.emit(TraceLevel::Debug, message);
    }

    fn emit<TF: FnOnce() -> String>(&self, level: TraceLevel, message: TF) {
        if level > self.level {
            return;
        }

        if self.path.is_empty() {
            println!("{}", message());
        } else {
            println!("{}: {}", self.path.join("/"), message());
        }
    }
}
