//! Raw-encoded NRRD volumes.
//!
//! The header is parsed once; slices are then read on demand by seeking into
//! the data, so at most one slice worth of bytes is buffered at a time.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use la_core::Image;
use log::{debug, warn};

use crate::source::check_slice_index;
use crate::{SliceSource, VolumeDims, VolumeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
}

impl SampleType {
    pub fn parse(name: &str) -> Result<Self, VolumeError> {
        let t = match name.trim() {
            "uchar" | "unsigned char" | "uint8" | "uint8_t" => Self::U8,
            "signed char" | "int8" | "int8_t" => Self::I8,
            "ushort" | "unsigned short" | "unsigned short int" | "uint16" | "uint16_t" => {
                Self::U16
            }
            "short" | "short int" | "signed short" | "signed short int" | "int16" | "int16_t" => {
                Self::I16
            }
            "uint" | "unsigned int" | "uint32" | "uint32_t" => Self::U32,
            "int" | "signed int" | "int32" | "int32_t" => Self::I32,
            other => return Err(VolumeError::UnsupportedType(other.to_string())),
        };
        Ok(t)
    }

    pub fn byte_size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 => 4,
        }
    }

    fn decode(self, bytes: &[u8], endian: Endian) -> i64 {
        match self {
            Self::U8 => i64::from(bytes[0]),
            Self::I8 => i64::from(bytes[0] as i8),
            Self::U16 => {
                let b = [bytes[0], bytes[1]];
                i64::from(match endian {
                    Endian::Little => u16::from_le_bytes(b),
                    Endian::Big => u16::from_be_bytes(b),
                })
            }
            Self::I16 => {
                let b = [bytes[0], bytes[1]];
                i64::from(match endian {
                    Endian::Little => i16::from_le_bytes(b),
                    Endian::Big => i16::from_be_bytes(b),
                })
            }
            Self::U32 => {
                let b = [bytes[0], bytes[1], bytes[2], bytes[3]];
                i64::from(match endian {
                    Endian::Little => u32::from_le_bytes(b),
                    Endian::Big => u32::from_be_bytes(b),
                })
            }
            Self::I32 => {
                let b = [bytes[0], bytes[1], bytes[2], bytes[3]];
                i64::from(match endian {
                    Endian::Little => i32::from_le_bytes(b),
                    Endian::Big => i32::from_be_bytes(b),
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// The subset of NRRD header fields needed to locate and decode raw data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NrrdHeader {
    pub dims: VolumeDims,
    pub sample: SampleType,
    pub endian: Endian,
    pub data_file: Option<String>,
    pub line_skip: usize,
    /// `-1` means the data occupies the last bytes of the data file.
    pub byte_skip: i64,
}

impl NrrdHeader {
    /// Reads the header from `reader`, returning it together with the number
    /// of bytes consumed (the offset of attached data).
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<(Self, u64), VolumeError> {
        let mut consumed = 0u64;
        let mut line = Vec::new();

        let n = reader.read_until(b'\n', &mut line)?;
        consumed += n as u64;
        let magic = String::from_utf8_lossy(&line);
        if !magic.starts_with("NRRD000") {
            return Err(VolumeError::header("missing NRRD magic"));
        }

        let mut sample = None;
        let mut dimension = None;
        let mut sizes: Option<Vec<usize>> = None;
        let mut encoding = None;
        let mut endian = None;
        let mut data_file = None;
        let mut line_skip = 0usize;
        let mut byte_skip = 0i64;

        loop {
            line.clear();
            let n = reader.read_until(b'\n', &mut line)?;
            if n == 0 {
                break;
            }
            consumed += n as u64;

            let text = String::from_utf8_lossy(&line);
            let text = text.trim_end_matches(['\n', '\r']);
            if text.is_empty() {
                break;
            }
            if text.starts_with('#') || text.contains(":=") {
                continue;
            }

            let Some((key, value)) = text.split_once(':') else {
                return Err(VolumeError::header(format!("malformed field '{text}'")));
            };
            let value = value.trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "type" => sample = Some(SampleType::parse(value)?),
                "dimension" => dimension = Some(parse_number::<usize>("dimension", value)?),
                "sizes" => {
                    sizes = Some(
                        value
                            .split_whitespace()
                            .map(|s| parse_number::<usize>("sizes", s))
                            .collect::<Result<_, _>>()?,
                    )
                }
                "encoding" => encoding = Some(value.to_ascii_lowercase()),
                "endian" => {
                    endian = Some(match value.to_ascii_lowercase().as_str() {
                        "little" => Endian::Little,
                        "big" => Endian::Big,
                        other => {
                            return Err(VolumeError::header(format!("unknown endian '{other}'")));
                        }
                    })
                }
                "data file" | "datafile" => data_file = Some(value.to_string()),
                "line skip" | "lineskip" => line_skip = parse_number("line skip", value)?,
                "byte skip" | "byteskip" => byte_skip = parse_number("byte skip", value)?,
                _ => {}
            }
        }

        let sample = sample.ok_or_else(|| VolumeError::header("missing 'type' field"))?;
        let dimension =
            dimension.ok_or_else(|| VolumeError::header("missing 'dimension' field"))?;
        let sizes = sizes.ok_or_else(|| VolumeError::header("missing 'sizes' field"))?;
        let encoding = encoding.ok_or_else(|| VolumeError::header("missing 'encoding' field"))?;

        if dimension != 3 || sizes.len() != 3 {
            return Err(VolumeError::header(format!(
                "expected a 3D volume, got dimension {dimension} with {} sizes",
                sizes.len()
            )));
        }
        if encoding != "raw" {
            return Err(VolumeError::UnsupportedEncoding(encoding));
        }
        if byte_skip < -1 {
            return Err(VolumeError::header(format!("invalid byte skip {byte_skip}")));
        }
        if let Some(file) = &data_file
            && (file.starts_with("LIST") || file.split_whitespace().count() > 1)
        {
            return Err(VolumeError::header(format!(
                "multi-file data '{file}' is not supported"
            )));
        }

        sizes[0]
            .checked_mul(sizes[1])
            .and_then(|v| v.checked_mul(sample.byte_size()))
            .and_then(|v| v.checked_mul(sizes[2]))
            .and_then(|v| u64::try_from(v).ok())
            .ok_or_else(|| VolumeError::header("volume size overflows"))?;

        let endian = match endian {
            Some(e) => e,
            None => {
                if sample.byte_size() > 1 {
                    warn!("NRRD header has no 'endian' field, assuming little endian");
                }
                Endian::Little
            }
        };

        Ok((
            Self {
                dims: VolumeDims::new(sizes[0], sizes[1], sizes[2]),
                sample,
                endian,
                data_file,
                line_skip,
                byte_skip,
            },
            consumed,
        ))
    }

    pub fn slice_bytes(&self) -> usize {
        self.dims.slice_len() * self.sample.byte_size()
    }

    /// Size of the whole data block in bytes.
    pub fn data_bytes(&self) -> u64 {
        self.slice_bytes() as u64 * self.dims.depth as u64
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, VolumeError> {
    value
        .trim()
        .parse()
        .map_err(|_| VolumeError::header(format!("invalid value '{value}' for '{field}'")))
}

/// NRRD volume read one slice at a time.
#[derive(Debug)]
pub struct NrrdVolume {
    header: NrrdHeader,
    data_path: PathBuf,
    reader: BufReader<File>,
    data_offset: u64,
    buf: Vec<u8>,
}

impl NrrdVolume {
    pub fn open(path: &Path) -> Result<Self, VolumeError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let (header, header_len) = NrrdHeader::read_from(&mut reader)?;

        let (data_path, mut reader, start) = match &header.data_file {
            Some(name) => {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                let data_path = base.join(name);
                let file = File::open(&data_path)?;
                (data_path, BufReader::new(file), 0u64)
            }
            None => (path.to_path_buf(), reader, header_len),
        };

        let data_offset = locate_data(&mut reader, &header, start)?;
        let available = reader
            .get_ref()
            .metadata()?
            .len()
            .saturating_sub(data_offset);
        if available < header.data_bytes() {
            return Err(VolumeError::Truncated {
                index: (available / header.slice_bytes() as u64) as usize,
            });
        }
        debug!(
            "opened NRRD volume {} ({}x{}x{}, {:?}, data at byte {})",
            data_path.display(),
            header.dims.width,
            header.dims.height,
            header.dims.depth,
            header.sample,
            data_offset
        );

        Ok(Self {
            buf: vec![0u8; header.slice_bytes()],
            header,
            data_path,
            reader,
            data_offset,
        })
    }

    pub fn header(&self) -> &NrrdHeader {
        &self.header
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
}

fn locate_data(
    reader: &mut BufReader<File>,
    header: &NrrdHeader,
    start: u64,
) -> Result<u64, VolumeError> {
    if header.byte_skip == -1 {
        let len = reader.get_ref().metadata()?.len();
        return len
            .checked_sub(header.data_bytes())
            .ok_or(VolumeError::Truncated { index: 0 });
    }

    reader.seek(SeekFrom::Start(start))?;
    let mut offset = start;
    let mut line = Vec::new();
    for _ in 0..header.line_skip {
        line.clear();
        let n = reader.read_until(b'\n', &mut line)?;
        if n == 0 {
            return Err(VolumeError::Truncated { index: 0 });
        }
        offset += n as u64;
    }

    Ok(offset + header.byte_skip as u64)
}

impl SliceSource for NrrdVolume {
    type Label = u32;

    fn dims(&self) -> VolumeDims {
        self.header.dims
    }

    fn read_slice(&mut self, z: usize) -> Result<Image<u32>, VolumeError> {
        check_slice_index(z, self.header.dims)?;

        let slice_bytes = self.header.slice_bytes() as u64;
        self.reader
            .seek(SeekFrom::Start(self.data_offset + z as u64 * slice_bytes))?;
        self.reader.read_exact(&mut self.buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                VolumeError::Truncated { index: z }
            } else {
                VolumeError::Io(e)
            }
        })?;

        let sample = self.header.sample;
        let endian = self.header.endian;
        let mut labels = Vec::with_capacity(self.header.dims.slice_len());
        for chunk in self.buf.chunks_exact(sample.byte_size()) {
            let value = sample.decode(chunk, endian);
            let label = u32::try_from(value)
                .map_err(|_| VolumeError::NegativeLabel { index: z, value })?;
            labels.push(label);
        }

        Ok(Image::from_vec(
            self.header.dims.width,
            self.header.dims.height,
            labels,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::{Path, PathBuf};

    use super::{Endian, NrrdHeader, NrrdVolume, SampleType};
    use crate::{SliceSource, VolumeError};

    fn write_nrrd(dir: &Path, name: &str, header: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut bytes = header.as_bytes().to_vec();
        bytes.extend_from_slice(data);
        std::fs::write(&path, bytes).expect("write nrrd");
        path
    }

    #[test]
    fn header_parses_required_fields() {
        let text = "NRRD0004\n# labels\ntype: unsigned short\ndimension: 3\n\
                    sizes: 4 3 2\nencoding: raw\nendian: big\nspace: left-posterior-superior\n\
                    key:=value\n\nDATA";
        let mut cursor = Cursor::new(text.as_bytes());
        let (header, consumed) = NrrdHeader::read_from(&mut cursor).expect("valid header");

        assert_eq!(header.sample, SampleType::U16);
        assert_eq!(header.endian, Endian::Big);
        assert_eq!(header.dims.width, 4);
        assert_eq!(header.dims.height, 3);
        assert_eq!(header.dims.depth, 2);
        assert_eq!(header.slice_bytes(), 24);
        assert_eq!(consumed as usize, text.len() - "DATA".len());
    }

    #[test]
    fn header_rejects_gzip_and_2d() {
        let gz = "NRRD0004\ntype: uchar\ndimension: 3\nsizes: 1 1 1\nencoding: gzip\n\n";
        let err = NrrdHeader::read_from(&mut Cursor::new(gz.as_bytes())).unwrap_err();
        assert!(matches!(err, VolumeError::UnsupportedEncoding(ref e) if e == "gzip"));

        let flat = "NRRD0004\ntype: uchar\ndimension: 2\nsizes: 4 4\nencoding: raw\n\n";
        let err = NrrdHeader::read_from(&mut Cursor::new(flat.as_bytes())).unwrap_err();
        assert!(matches!(err, VolumeError::InvalidHeader { .. }));

        let bad = "P5\n";
        let err = NrrdHeader::read_from(&mut Cursor::new(bad.as_bytes())).unwrap_err();
        assert!(matches!(err, VolumeError::InvalidHeader { .. }));
    }

    #[test]
    fn oversized_sizes_are_header_errors() {
        let huge = "NRRD0004\ntype: uchar\ndimension: 3\n\
                    sizes: 4294967296 4294967296 2\nencoding: raw\n\n";
        let err = NrrdHeader::read_from(&mut Cursor::new(huge.as_bytes())).unwrap_err();
        assert!(matches!(err, VolumeError::InvalidHeader { .. }), "{err:?}");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_nrrd(dir.path(), "huge.nrrd", huge, &[1, 2, 3]);
        assert!(matches!(
            NrrdVolume::open(&path).unwrap_err(),
            VolumeError::InvalidHeader { .. }
        ));
    }

    #[test]
    fn data_shorter_than_header_fails_at_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        let header = "NRRD0004\ntype: ushort\ndimension: 3\nsizes: 4096 4096 64\n\
                      encoding: raw\nendian: little\n\n";
        let path = write_nrrd(dir.path(), "big.nrrd", header, &[0; 16]);
        assert!(matches!(
            NrrdVolume::open(&path).unwrap_err(),
            VolumeError::Truncated { index: 0 }
        ));

        let header = "NRRD0004\ntype: uchar\ndimension: 3\nsizes: 2 1 3\nencoding: raw\n\
                      data file: labels.raw\n";
        let nhdr = dir.path().join("labels.nhdr");
        std::fs::write(&nhdr, header).expect("write header");
        std::fs::write(dir.path().join("labels.raw"), [1u8, 2, 3, 4]).expect("write data");
        assert!(matches!(
            NrrdVolume::open(&nhdr).unwrap_err(),
            VolumeError::Truncated { index: 2 }
        ));
    }

    #[test]
    fn reads_attached_little_endian_slices() {
        let dir = tempfile::tempdir().expect("tempdir");
        let header = "NRRD0004\ntype: ushort\ndimension: 3\nsizes: 2 2 2\n\
                      encoding: raw\nendian: little\n\n";
        let values: [u16; 8] = [1, 1, 2, 2, 1, 3, 2, 2];
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let path = write_nrrd(dir.path(), "labels.nrrd", header, &data);

        let mut vol = NrrdVolume::open(&path).expect("open");
        assert_eq!(vol.dims().depth, 2);
        assert_eq!(vol.read_slice(1).expect("slice 1").data(), &[1, 3, 2, 2]);
        assert_eq!(vol.read_slice(0).expect("slice 0").data(), &[1, 1, 2, 2]);
        assert!(vol.read_slice(2).is_err());
    }

    #[test]
    fn reads_detached_data_with_byte_skip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let header = "NRRD0004\ntype: uint32\ndimension: 3\nsizes: 1 2 1\nencoding: raw\n\
                      endian: big\ndata file: labels.raw\nbyte skip: 3\n";
        let nhdr = dir.path().join("labels.nhdr");
        std::fs::write(&nhdr, header).expect("write header");

        let mut raw = vec![0xffu8; 3];
        raw.extend_from_slice(&7u32.to_be_bytes());
        raw.extend_from_slice(&4000u32.to_be_bytes());
        std::fs::write(dir.path().join("labels.raw"), raw).expect("write data");

        let mut vol = NrrdVolume::open(&nhdr).expect("open");
        assert_eq!(vol.read_slice(0).expect("slice").data(), &[7, 4000]);
    }

    #[test]
    fn trailing_data_with_negative_byte_skip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let header = "NRRD0004\ntype: uchar\ndimension: 3\nsizes: 2 1 1\nencoding: raw\n\
                      byte skip: -1\n\n";
        let path = write_nrrd(dir.path(), "tail.nrrd", header, &[9, 9, 9, 5, 6]);

        let mut vol = NrrdVolume::open(&path).expect("open");
        assert_eq!(vol.read_slice(0).expect("slice").data(), &[5, 6]);
    }

    #[test]
    fn truncated_and_negative_data_are_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let header = "NRRD0004\ntype: uchar\ndimension: 3\nsizes: 2 2 2\nencoding: raw\n\n";
        let path = write_nrrd(dir.path(), "short.nrrd", header, &[1, 2, 3, 4, 5]);
        assert!(matches!(
            NrrdVolume::open(&path).unwrap_err(),
            VolumeError::Truncated { index: 1 }
        ));

        let header = "NRRD0004\ntype: short\ndimension: 3\nsizes: 1 1 1\nencoding: raw\n\
                      endian: little\n\n";
        let path = write_nrrd(dir.path(), "neg.nrrd", header, &(-2i16).to_le_bytes());
        let mut vol = NrrdVolume::open(&path).expect("open");
        assert!(matches!(
            vol.read_slice(0).unwrap_err(),
            VolumeError::NegativeLabel { index: 0, value: -2 }
        ));
    }
}
