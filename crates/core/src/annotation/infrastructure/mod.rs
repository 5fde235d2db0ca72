pub mod rest_video_annotator;
