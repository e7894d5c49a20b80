pub const BOUNDARY: &str = "parley-test-boundary";

/// Builds `multipart/form-data` request bodies for router tests.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> MultipartForm {
        return MultipartForm::default();
    }

    pub fn content_type() -> String {
        return format!("multipart/form-data; boundary={BOUNDARY}");
    }

    pub fn text(mut self, name: &str, value: &str) -> MultipartForm {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        return self;
    }

    pub fn file(mut self, name: &str, file_name: &str, mime_type: &str, bytes: &[u8]) -> MultipartForm {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {mime_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        return self;
    }

    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        return self.body;
    }
}

/// First bytes of a PNG file, enough for mime sniffing in tests.
pub fn png_fixture() -> Vec<u8> {
    return vec![137, 80, 78, 71, 13, 10, 26, 10];
}
