//! Command set served by the daemon.

use babbler_core::builtins::register_builtins;
use babbler_core::{CommandRegistry, register_devinfo_commands};
use babbler_types::config::DeviceInfo;

/// Built-ins first, then the device identity commands.
pub fn build_registry(device: &DeviceInfo) -> CommandRegistry {
    let mut reg = CommandRegistry::new();
    register_builtins(&mut reg);
    register_devinfo_commands(&mut reg, device);
    reg
}

#[cfg(test)]
mod tests {
    use babbler_core::{Engine, ReplyBuffer};

    use super::*;

    #[test]
    fn serves_builtins_and_device_info() {
        let device = DeviceInfo {
            name: "bench-rig".into(),
            ..DeviceInfo::default()
        };
        let reg = build_registry(&device);
        assert_eq!(reg.len(), 9);

        let engine = Engine::new(&reg);
        let mut reply = ReplyBuffer::with_capacity(256);
        engine.run_batch("ping;name", &mut reply);
        assert_eq!(reply.to_str_lossy(), "ok;bench-rig");
    }

    #[test]
    fn help_lists_everything() {
        let reg = build_registry(&DeviceInfo::default());
        let engine = Engine::new(&reg);
        let mut reply = ReplyBuffer::with_capacity(256);
        engine.handle_command("help --list", &mut reply);
        assert_eq!(
            reply.to_str_lossy(),
            "help ping name model serial_number description version manufacturer uri"
        );
    }
}
