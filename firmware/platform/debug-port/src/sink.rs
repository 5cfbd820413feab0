use core::fmt;

/// A `fmt::Write` sink emitting every byte to one I/O port.
///
/// Writes are unbuffered and never fail. With the `enabled` feature off, or
/// on targets without port I/O, they are discarded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PortSink {
    port: u16,
}

impl PortSink {
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self { port }
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[inline]
    pub fn write_byte(&self, byte: u8) {
        outb(self.port, byte);
    }
}

impl fmt::Write for PortSink {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            self.write_byte(b);
        }
        Ok(())
    }
}

#[cfg(all(feature = "enabled", any(target_arch = "x86", target_arch = "x86_64")))]
#[allow(clippy::inline_always)]
#[inline(always)]
fn outb(port: u16, val: u8) {
    // SAFETY: a byte write to a debug port has no memory effects.
    unsafe {
        core::arch::asm!(
            "out dx, al",
            in("dx") port,
            in("al") val,
            options(nomem, nostack, preserves_flags)
        );
    }
}

#[cfg(not(all(feature = "enabled", any(target_arch = "x86", target_arch = "x86_64"))))]
#[inline]
const fn outb(_port: u16, _val: u8) {}
