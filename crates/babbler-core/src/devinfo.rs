//! Device identity commands.
//!
//! Each command replies with one configured string and ignores its
//! arguments: `name`, `model`, `serial_number`, `description`, `version`,
//! `manufacturer`, `uri`.

use babbler_types::buffer::ReplyBuffer;
use babbler_types::config::DeviceInfo;
use babbler_types::reply::ReplyCode;

use crate::command::{Command, Environment};
use crate::registry::CommandRegistry;

/// A command that reports one device property.
pub struct DeviceInfoCmd {
    name: &'static str,
    description: String,
    manual: String,
    value: String,
}

impl DeviceInfoCmd {
    /// `what` is the property as it reads in prose, e.g. "serial number".
    pub fn new(name: &'static str, what: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            description: format!("get device {what}"),
            manual: format!("SYNOPSIS\n    {name}\nDESCRIPTION\nGet device {what}."),
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Command for DeviceInfoCmd {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }
    fn manual(&self) -> Option<&str> {
        Some(&self.manual)
    }
    fn execute(
        &self,
        _args: &[&str],
        reply: &mut ReplyBuffer,
        _env: &Environment<'_>,
    ) -> ReplyCode {
        reply.reply(&self.value)
    }
}

/// Register all seven identity commands, reading values from `info`.
pub fn register_devinfo_commands(reg: &mut CommandRegistry, info: &DeviceInfo) {
    let commands = [
        ("name", "name", &info.name),
        ("model", "model", &info.model),
        ("serial_number", "serial number", &info.serial_number),
        ("description", "description", &info.description),
        ("version", "version", &info.version),
        ("manufacturer", "manufacturer", &info.manufacturer),
        ("uri", "uri", &info.uri),
    ];
    for (name, what, value) in commands {
        reg.register(Box::new(DeviceInfoCmd::new(name, what, value.as_str())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> DeviceInfo {
        DeviceInfo {
            name: "DeviceX".into(),
            model: "ModelY".into(),
            serial_number: "SN-0042".into(),
            description: "test rig".into(),
            version: "1.2.3".into(),
            manufacturer: "Acme".into(),
            uri: "http://acme.example/x".into(),
        }
    }

    fn registry() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        register_devinfo_commands(&mut reg, &info());
        reg
    }

    #[test]
    fn registers_seven_in_order() {
        let reg = registry();
        let names: Vec<&str> = reg.commands().map(|c| c.name()).collect();
        assert_eq!(names, vec![
            "name",
            "model",
            "serial_number",
            "description",
            "version",
            "manufacturer",
            "uri"
        ]);
    }

    #[test]
    fn each_reports_its_value() {
        let reg = registry();
        let expected = info();
        for (name, value) in [
            ("name", &expected.name),
            ("model", &expected.model),
            ("serial_number", &expected.serial_number),
            ("description", &expected.description),
            ("version", &expected.version),
            ("manufacturer", &expected.manufacturer),
            ("uri", &expected.uri),
        ] {
            let mut reply = ReplyBuffer::with_capacity(64);
            let code = reg.dispatch(name, &[name], &mut reply);
            assert_eq!(reply.to_str_lossy(), value.as_str(), "{name}");
            assert_eq!(code, ReplyCode::Written(value.len()));
        }
    }

    #[test]
    fn arguments_are_ignored() {
        let mut reply = ReplyBuffer::with_capacity(64);
        registry().dispatch("model", &["model", "--verbose"], &mut reply);
        assert_eq!(reply.to_str_lossy(), "ModelY");
    }

    #[test]
    fn empty_value_is_no_reply() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(DeviceInfoCmd::new("uri", "uri", "")));
        let mut reply = ReplyBuffer::with_capacity(8);
        assert_eq!(reg.dispatch("uri", &["uri"], &mut reply), ReplyCode::NoReply);
    }

    #[test]
    fn long_value_overflows() {
        let mut reply = ReplyBuffer::with_capacity(3);
        assert_eq!(
            registry().dispatch("manufacturer", &["manufacturer"], &mut reply),
            ReplyCode::BufferError
        );
    }

    #[test]
    fn help_text() {
        let cmd = DeviceInfoCmd::new("serial_number", "serial number", "1");
        assert_eq!(cmd.description(), Some("get device serial number"));
        assert_eq!(
            cmd.manual(),
            Some("SYNOPSIS\n    serial_number\nDESCRIPTION\nGet device serial number.")
        );
        assert_eq!(cmd.value(), "1");
    }
}
