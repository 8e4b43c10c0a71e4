use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum Setting {
    String(String),
    Int(i64),
}

impl Setting {
    fn as_string(&self) -> Option<&String> {
        if let Setting::String(value) = self {
            Some(value)
        } else {
            None
        }
    }

    fn as_int(&self) -> Option<&i64> {
        if let Setting::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

/// Key/value source for configuration such as [`crate::crl::CrlConfig`].
pub trait Settings {
    fn get(&self, key: &str) -> Option<Setting>;
    fn get_string(&self, key: &str) -> Option<String> {
        let setting = self.get(key)?;
        setting.as_string().cloned()
    }
    fn get_int(&self, key: &str) -> Option<i64> {
        let setting = self.get(key)?;
        setting.as_int().cloned()
    }
    fn set(&mut self, key: &str, value: Setting);
    fn set_string(&mut self, key: &str, value: String) {
        self.set(key, Setting::String(value));
    }
    fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, Setting::Int(value));
    }
}

impl Settings for HashMap<String, Setting> {
    fn get(&self, key: &str) -> Option<Setting> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: Setting) {
        self.insert(key.to_string(), value);
    }
}
