use std::io::{self, BufWriter, Stdout, Write};
use std::os::unix::io::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};

static RESIZE_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigwinch(_: libc::c_int) {
    RESIZE_REQUESTED.store(true, Ordering::Relaxed);
}

/// A rectangular region of the screen, 1-based like the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub row: u16,
    pub col: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, row: u16, col: u16) -> bool {
        row >= self.row
            && row < self.row + self.height
            && col >= self.col
            && col < self.col + self.width
    }
}

/// Raw-mode terminal on the alternate screen. Restores the original mode on
/// drop.
pub struct Terminal {
    original_termios: libc::termios,
    out: BufWriter<Stdout>,
    pub rows: u16,
    pub cols: u16,
    mouse: bool,
}

impl Terminal {
    pub fn new(mouse: bool) -> io::Result<Self> {
        let stdin_fd = io::stdin().as_raw_fd();

        let mut original_termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(stdin_fd, &mut original_termios) } == -1 {
            return Err(io::Error::last_os_error());
        }

        // IXON off so Ctrl-S reaches us as the send key.
        let mut raw = original_termios;
        raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag |= libc::CS8;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        // read() returns after 100ms with no input, which paces the event loop
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 1;

        if unsafe { libc::tcsetattr(stdin_fd, libc::TCSAFLUSH, &raw) } == -1 {
            return Err(io::Error::last_os_error());
        }

        unsafe {
            let mut sa: libc::sigaction = std::mem::zeroed();
            sa.sa_sigaction = handle_sigwinch as libc::sighandler_t;
            libc::sigemptyset(&mut sa.sa_mask);
            sa.sa_flags = 0;
            libc::sigaction(libc::SIGWINCH, &sa, std::ptr::null_mut());
        }

        let (rows, cols) = get_window_size()?;

        let mut out = BufWriter::new(io::stdout());
        write!(out, "\x1b[?1049h\x1b[?25l")?;
        if mouse {
            write!(out, "\x1b[?1000h\x1b[?1006h")?;
        }
        out.flush()?;

        Ok(Terminal {
            original_termios,
            out,
            rows,
            cols,
            mouse,
        })
    }

    /// Check if a resize was signaled and update dimensions.
    pub fn check_resize(&mut self) -> bool {
        if RESIZE_REQUESTED.swap(false, Ordering::Relaxed) {
            if let Ok((rows, cols)) = get_window_size() {
                self.rows = rows;
                self.cols = cols;
                return true;
            }
        }
        false
    }

    pub fn clear(&mut self) -> io::Result<()> {
        write!(self.out, "\x1b[2J\x1b[H")
    }

    pub fn move_to(&mut self, row: u16, col: u16) -> io::Result<()> {
        write!(self.out, "\x1b[{};{}H", row, col)
    }

    /// Write trusted text (our own labels and rules) as-is.
    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        write!(self.out, "{}", s)
    }

    pub fn set_reverse(&mut self) -> io::Result<()> {
        write!(self.out, "\x1b[7m")
    }

    pub fn set_bold(&mut self) -> io::Result<()> {
        write!(self.out, "\x1b[1m")
    }

    pub fn set_dim(&mut self) -> io::Result<()> {
        write!(self.out, "\x1b[2m")
    }

    pub fn reset_attr(&mut self) -> io::Result<()> {
        write!(self.out, "\x1b[0m")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Write at most `max_width` characters of `s`, with control characters
    /// from server-supplied text neutralized.
    pub fn write_truncated(&mut self, s: &str, max_width: u16) -> io::Result<()> {
        write!(self.out, "{}", fit(s, max_width as usize))
    }

    /// Like `write_truncated`, but pads with spaces to exactly `width`.
    pub fn write_padded(&mut self, s: &str, width: u16) -> io::Result<()> {
        let text = fit(s, width as usize);
        let pad = (width as usize).saturating_sub(text.chars().count());
        write!(self.out, "{}{}", text, " ".repeat(pad))
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.mouse {
            let _ = write!(self.out, "\x1b[?1000l\x1b[?1006l");
        }
        let _ = write!(self.out, "\x1b[?25h\x1b[?1049l");
        let _ = self.out.flush();

        let stdin_fd = io::stdin().as_raw_fd();
        unsafe {
            libc::tcsetattr(stdin_fd, libc::TCSAFLUSH, &self.original_termios);
        }
    }
}

/// Printable prefix of `s` no longer than `max` characters. Escape sequences
/// embedded in message text must not reach the terminal.
pub fn fit(s: &str, max: usize) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(max)
        .collect()
}

fn get_window_size() -> io::Result<(u16, u16)> {
    #[repr(C)]
    struct WinSize {
        ws_row: u16,
        ws_col: u16,
        ws_xpixel: u16,
        ws_ypixel: u16,
    }

    let mut ws: WinSize = unsafe { std::mem::zeroed() };
    let fd = io::stdout().as_raw_fd();

    if unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) } == -1 {
        return Err(io::Error::last_os_error());
    }

    Ok((ws.ws_row, ws.ws_col))
}
