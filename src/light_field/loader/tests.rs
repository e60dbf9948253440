#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use image::{GrayImage, Luma, Rgb, RgbImage};
    use tempfile::TempDir;

    use crate::light_field::common::error::{LightFieldError, Result};
    use crate::light_field::loader::{
        CaptureReader, LightFieldLoader, LoadConfig, list_image_files,
    };
    use crate::light_field::model::{PointF, ViewGrid};
    use crate::light_field::synthetic;

    struct MockReader {
        should_fail: bool,
        tile: u32,
    }

    impl CaptureReader for MockReader {
        fn read_capture(&self, _data: &[u8]) -> Result<RgbImage> {
            if self.should_fail {
                return Err(LightFieldError::DecodeError("Mock decode error".to_string()));
            }
            Ok(synthetic::tiled_capture(ViewGrid::new(2).unwrap(), self.tile, self.tile))
        }

        fn read_disparity(&self, _data: &[u8]) -> Result<GrayImage> {
            Ok(GrayImage::from_pixel(self.tile, self.tile, Luma([128])))
        }
    }

    fn dataset(frames: &[(&str, u8)], disparity: &[(&str, u8)]) -> TempDir {
        let root = TempDir::new().unwrap();
        let capture_dir = root.path().join("lightfield");
        let disparity_dir = root.path().join("disparity");
        fs::create_dir_all(&capture_dir).unwrap();
        fs::create_dir_all(&disparity_dir).unwrap();

        for (name, value) in frames {
            RgbImage::from_pixel(16, 8, Rgb([*value, 0, 0]))
                .save(capture_dir.join(name))
                .unwrap();
        }
        for (name, value) in disparity {
            GrayImage::from_pixel(2, 1, Luma([*value]))
                .save(disparity_dir.join(name))
                .unwrap();
        }
        root
    }

    #[test]
    fn test_load_config_builder() {
        let config = LoadConfig::builder()
            .grid_size(4)
            .capture_dir_name("raw")
            .disparity_dir_name("depth")
            .build();
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.capture_dir_name, "raw");
        assert_eq!(config.disparity_dir_name, "depth");

        let default = LoadConfig::default();
        assert_eq!(default.grid_size, 8);
        assert_eq!(default.capture_dir_name, "lightfield");
    }

    #[test]
    fn test_load_dir_orders_frames_by_file_name() {
        let root = dataset(
            &[("frame_b.png", 20), ("frame_a.png", 10), ("frame_c.png", 30)],
            &[("d_b.png", 255), ("d_a.png", 0)],
        );
        fs::write(root.path().join("lightfield/notes.txt"), "not an image").unwrap();

        let video = LightFieldLoader::new(LoadConfig::default())
            .load_dir(root.path())
            .unwrap();

        assert_eq!(video.frame_count(), 3);
        assert_eq!(video.disparity_count(), 2);
        assert_eq!(video.view_size(), (2, 1));
        for (frame_id, expected) in [(0, 10.0), (1, 20.0), (2, 30.0)] {
            assert_eq!(video.central_view(frame_id).unwrap().get_pixel(0, 0).0[0], expected);
        }
        assert_eq!(video.disparity_at(0, PointF::new(0.0, 0.0)).unwrap(), -10.0);
        assert_eq!(video.disparity_at(1, PointF::new(1.0, 0.0)).unwrap(), 10.0);
    }

    #[test]
    fn test_unreadable_capture_is_reported() {
        let root = dataset(&[("a.png", 1)], &[("a.png", 1)]);
        fs::write(root.path().join("lightfield/b.png"), b"definitely not a png").unwrap();

        let result = LightFieldLoader::new(LoadConfig::default()).load_dir(root.path());
        match result {
            Err(LightFieldError::DecodeError(msg)) => assert!(msg.contains("b.png")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_directory_is_reported() {
        let root = TempDir::new().unwrap();
        let result = LightFieldLoader::new(LoadConfig::default()).load_dir(root.path());
        assert!(matches!(result, Err(LightFieldError::InputReadError(_))));
    }

    #[test]
    fn test_empty_directory_is_reported() {
        let root = dataset(&[], &[("a.png", 1)]);
        let result = LightFieldLoader::new(LoadConfig::default()).load_dir(root.path());
        assert!(matches!(result, Err(LightFieldError::EmptySequence(_))));
    }

    #[test]
    fn test_custom_reader_and_grid() {
        let root = dataset(&[("a.png", 1), ("b.png", 2)], &[("a.png", 1)]);
        let config = LoadConfig::builder().grid_size(2).build();
        let loader = LightFieldLoader::with_custom(MockReader { should_fail: false, tile: 3 }, config);

        let video = loader.load_dir(root.path()).unwrap();
        assert_eq!(video.frame_count(), 2);
        assert_eq!(video.view_count(), 4);
        assert_eq!(video.view_size(), (3, 3));
        assert_eq!(video.view_by_id(1, 3).unwrap().get_pixel(2, 2).0, [3.0; 3]);
    }

    #[test]
    fn test_custom_reader_failure_propagates() {
        let root = dataset(&[("a.png", 1)], &[("a.png", 1)]);
        let loader = LightFieldLoader::with_custom(
            MockReader { should_fail: true, tile: 3 },
            LoadConfig::default(),
        );
        assert!(matches!(
            loader.load_dir(root.path()),
            Err(LightFieldError::DecodeError(_))
        ));
    }

    #[test]
    fn test_list_image_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.PNG", "a.jpg", "c.txt", "d.tif"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("e.png")).unwrap();

        let files = list_image_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "d.tif"]);
        assert!(list_image_files(Path::new("/nonexistent/lfvideo")).is_err());
    }
}
