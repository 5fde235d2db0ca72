pub mod stdin_line_source;
