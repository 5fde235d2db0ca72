pub mod annotation {
    pub mod domain {
        pub mod annotate_request;
        pub mod annotation_results;
        pub mod operation;
        pub mod video_annotator;
    }
    pub mod infrastructure;
}

pub mod input {
    pub mod domain {
        pub mod input_choice;
        pub mod line_source;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod detect_text_gcs_use_case;
    pub mod detect_text_local_use_case;
    pub mod operation_logger;
    pub mod operation_waiter;
    pub mod request_builder;
    pub mod result_printer;
}

pub mod shared {
    pub mod constants;
    pub mod error;
    pub mod settings;
    pub mod time_offset;
}
