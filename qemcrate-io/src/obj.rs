//! OBJ format support
//!
//! Parsing is split in two: [`ObjTokenizer`] turns lines into typed records,
//! and [`ObjReader`] assembles those records into a [`LoadedMesh`].

use crate::error::RecordError;
use crate::{LoadReport, MeshReader};
use qemcrate_core::{Error, Face, LoadedMesh, MeshDiagnostic, Point3d, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// A `v` line
#[derive(Debug, Clone, PartialEq)]
pub struct VertexRecord {
    pub line: usize,
    pub position: Point3d,
}

/// An `f` line: the vertex indices of every token that parsed, plus the
/// tokens that did not
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRecord {
    pub line: usize,
    pub indices: Vec<usize>,
    pub rejected: Vec<RecordError>,
}

/// A `v` line that could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidRecord {
    pub line: usize,
    pub error: RecordError,
}

/// A typed OBJ record
#[derive(Debug, Clone, PartialEq)]
pub enum ObjRecord {
    Vertex(VertexRecord),
    Face(FaceRecord),
    Invalid(InvalidRecord),
}

/// Parse one line. Returns `None` for lines the pipeline does not consume.
pub fn parse_line(line_number: usize, line: &str) -> Option<ObjRecord> {
    let mut tokens = line.split_whitespace();
    match tokens.next()? {
        "v" => Some(parse_vertex(line_number, tokens)),
        "f" => Some(ObjRecord::Face(parse_face(line_number, tokens))),
        _ => None,
    }
}

fn parse_vertex<'a>(line: usize, tokens: impl Iterator<Item = &'a str>) -> ObjRecord {
    // Extra fields (w, vertex colours) are ignored
    let fields: Vec<&str> = tokens.take(3).collect();
    if fields.len() < 3 {
        return ObjRecord::Invalid(InvalidRecord {
            line,
            error: RecordError::MissingCoordinates { found: fields.len() },
        });
    }

    let mut coords = [0.0f64; 3];
    for (slot, token) in coords.iter_mut().zip(&fields) {
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => *slot = value,
            _ => {
                return ObjRecord::Invalid(InvalidRecord {
                    line,
                    error: RecordError::InvalidCoordinate {
                        token: token.to_string(),
                    },
                })
            }
        }
    }

    ObjRecord::Vertex(VertexRecord {
        line,
        position: Point3d::new(coords[0], coords[1], coords[2]),
    })
}

fn parse_face<'a>(line: usize, tokens: impl Iterator<Item = &'a str>) -> FaceRecord {
    let mut indices = Vec::with_capacity(3);
    let mut rejected = Vec::new();

    for token in tokens {
        // index, index/tex or index/tex/normal; only the vertex index is used
        let vertex = token.split('/').next().unwrap_or_default();
        match vertex.parse::<usize>() {
            Ok(index) => indices.push(index),
            Err(_) => rejected.push(RecordError::InvalidIndex {
                token: token.to_string(),
            }),
        }
    }

    FaceRecord {
        line,
        indices,
        rejected,
    }
}

/// Streaming tokenizer over any buffered reader.
///
/// Yields one record per consumed line; I/O failures end the stream with an
/// error. Lines are decoded lossily so stray non-UTF-8 bytes only spoil the
/// line they appear on.
pub struct ObjTokenizer<R> {
    reader: R,
    buffer: Vec<u8>,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> ObjTokenizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            line_number: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for ObjTokenizer<R> {
    type Item = std::io::Result<ObjRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_number += 1;
                    let line = String::from_utf8_lossy(&self.buffer);
                    if let Some(record) = parse_line(self.line_number, &line) {
                        return Some(Ok(record));
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

pub struct ObjReader;

impl ObjReader {
    /// Load a mesh from any buffered reader.
    ///
    /// `source_name` labels the source in errors and logs.
    pub fn from_reader<R: BufRead>(reader: R, source_name: &str) -> Result<LoadReport> {
        let mut vertices = Vec::new();
        let mut candidates: Vec<(usize, [usize; 3])> = Vec::new();
        let mut diagnostics = Vec::new();

        for record in ObjTokenizer::new(reader) {
            let record = record.map_err(|e| Error::source_unavailable(source_name, e))?;
            match record {
                ObjRecord::Vertex(vertex) => vertices.push(vertex.position),
                ObjRecord::Invalid(invalid) => {
                    warn!("{}:{}: error parsing vertex line: {}", source_name, invalid.line, invalid.error);
                    diagnostics.push(MeshDiagnostic::MalformedVertex {
                        line: invalid.line,
                        reason: invalid.error.to_string(),
                    });
                }
                ObjRecord::Face(face) => {
                    for error in &face.rejected {
                        warn!("{}:{}: error parsing face line: {}", source_name, face.line, error);
                        if let RecordError::InvalidIndex { token } = error {
                            diagnostics.push(MeshDiagnostic::MalformedFaceToken {
                                line: face.line,
                                token: token.clone(),
                            });
                        }
                    }
                    match face.indices[..] {
                        [a, b, c] => candidates.push((face.line, [a, b, c])),
                        _ => {
                            warn!(
                                "{}:{}: skipping non-triangular face {:?}",
                                source_name, face.line, face.indices
                            );
                            diagnostics.push(MeshDiagnostic::UnsupportedFace {
                                line: face.line,
                                vertex_count: face.indices.len(),
                            });
                        }
                    }
                }
            }
        }

        // Faces may precede the vertices they reference, so indices are
        // checked only once every vertex is known.
        let vertex_count = vertices.len();
        let mut faces = Vec::with_capacity(candidates.len());
        for (line, indices) in candidates {
            let face = Face::from(indices);
            if face.resolves_within(vertex_count) {
                faces.push(face);
                continue;
            }
            for &index in indices.iter().filter(|&&i| i == 0 || i > vertex_count) {
                warn!(
                    "{}:{}: face index {} out of range for {} vertices",
                    source_name, line, index, vertex_count
                );
                diagnostics.push(MeshDiagnostic::FaceIndexOutOfRange {
                    line,
                    index,
                    vertex_count,
                });
            }
        }

        let mesh = LoadedMesh::new(vertices, faces)?;
        info!(
            "{}: loaded {} vertices, {} faces, {} edges",
            source_name,
            mesh.vertex_count(),
            mesh.face_count(),
            mesh.edges().len()
        );
        if mesh.face_count() == 0 {
            info!("{}: no faces were loaded", source_name);
        }
        debug!("{}: {} records dropped", source_name, diagnostics.len());

        Ok(LoadReport { mesh, diagnostics })
    }

    /// Load a mesh from an in-memory OBJ description
    pub fn from_str_source(source: &str) -> Result<LoadReport> {
        Self::from_reader(source.as_bytes(), "<memory>")
    }
}

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<LoadReport> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| Error::source_unavailable(name.as_str(), e))?;
        Self::from_reader(BufReader::new(file), &name)
    }
}
