use std::{
    fmt::{self, Display, Formatter},
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Copy)]
pub enum Stage {
    Parse,
    Reproject,
    Normalize,
    Encode,
    Write,
}

#[derive(Default, Debug, Clone, Copy)]
struct TimeTrack {
    count: u32,
    duration: Duration,
}

impl TimeTrack {
    fn add(&mut self, duration: Duration) {
        self.duration += duration;
        self.count += 1;
    }

    fn merge(&mut self, other: &Self) {
        self.duration += other.duration;
        self.count += other.count;
    }
}

impl Display for TimeTrack {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "-")
        } else {
            write!(
                f,
                "{}/{}={}",
                self.duration.as_micros(),
                self.count,
                (self.duration / self.count).as_micros()
            )
        }
    }
}

/// Per-stage durations of one or more conversions, in microseconds.
#[derive(Default, Debug, Clone)]
pub struct TimeStats {
    parse: TimeTrack,
    reproject: TimeTrack,
    normalize: TimeTrack,
    encode: TimeTrack,
    write: TimeTrack,
}

impl TimeStats {
    pub fn add(&mut self, stage: Stage, duration: Duration) {
        self.track_mut(stage).add(duration);
    }

    /// Runs `f` and records its duration under `stage`.
    pub fn track<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let instant = Instant::now();

        let result = f();

        self.add(stage, instant.elapsed());

        result
    }

    pub fn merge(&mut self, other: &Self) {
        self.parse.merge(&other.parse);
        self.reproject.merge(&other.reproject);
        self.normalize.merge(&other.normalize);
        self.encode.merge(&other.encode);
        self.write.merge(&other.write);
    }

    pub fn count(&self, stage: Stage) -> u32 {
        match stage {
            Stage::Parse => self.parse.count,
            Stage::Reproject => self.reproject.count,
            Stage::Normalize => self.normalize.count,
            Stage::Encode => self.encode.count,
            Stage::Write => self.write.count,
        }
    }

    pub fn total(&self) -> Duration {
        self.parse.duration
            + self.reproject.duration
            + self.normalize.duration
            + self.encode.duration
            + self.write.duration
    }

    fn track_mut(&mut self, stage: Stage) -> &mut TimeTrack {
        match stage {
            Stage::Parse => &mut self.parse,
            Stage::Reproject => &mut self.reproject,
            Stage::Normalize => &mut self.normalize,
            Stage::Encode => &mut self.encode,
            Stage::Write => &mut self.write,
        }
    }
}

impl Display for TimeStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse: {}, reproject: {}, normalize: {}, encode: {}, write: {} | {}",
            self.parse,
            self.reproject,
            self.normalize,
            self.encode,
            self.write,
            self.total().as_micros()
        )
    }
}
