use indexmap::IndexMap;

/// One endpoint of a native from/to interpolation: an ordered map of style
/// property name to literal value. Order is preserved so hosts that prime
/// styles property-by-property do it deterministically.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframe {
    props: IndexMap<String, String>,
}

impl Keyframe {
    pub fn new() -> Self {
        Self {
            props: IndexMap::new(),
        }
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.props.insert(property.into(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.props.get(property).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Keyframe {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut frame = Self::new();
        for (k, v) in iter {
            frame.set(k, v);
        }
        frame
    }
}

/// Timing parameters handed to the native interpolation primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeTiming {
    /// Duration in milliseconds.
    pub duration_millis: f64,
    /// CSS easing string (`ease-in-out`, `linear`, `cubic-bezier(...)`).
    pub easing: String,
    /// Keep the final keyframe applied after the interpolation ends.
    pub fill_forwards: bool,
}

impl KeyframeTiming {
    pub fn new(duration_millis: f64, easing: impl Into<String>) -> Self {
        Self {
            duration_millis,
            easing: easing.into(),
            fill_forwards: true,
        }
    }
}

/// Handle over one running native interpolation.
pub trait KeyframePlayer {
    /// One-shot finish signal. The callback must not fire after `cancel`.
    fn on_finish(&self, callback: Box<dyn FnOnce()>);

    /// Stops the interpolation and releases its hold on the element's style.
    fn cancel(&self);
}
