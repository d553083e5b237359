//! ISO well-known binary, little-endian.
//!
//! Z geometries use the ISO type codes (base type + 1000). The decoder also
//! accepts big-endian input and the EWKB-style 0x80000000 Z flag.

use bytes::{Buf, BufMut, BytesMut};
use ras_common::{RasError, RasResult};

use crate::geometry::Geometry;

const WKB_POINT: u32 = 1;
const WKB_LINESTRING: u32 = 2;
const WKB_POLYGON: u32 = 3;
const WKB_MULTIPOINT: u32 = 4;
const WKB_MULTILINESTRING: u32 = 5;
const WKB_MULTIPOLYGON: u32 = 6;
const Z_OFFSET: u32 = 1000;
const EWKB_Z_FLAG: u32 = 0x8000_0000;

const LITTLE_ENDIAN: u8 = 1;

/// Encode a geometry.
pub fn encode(geometry: &Geometry) -> Vec<u8> {
    let mut buf = BytesMut::new();
    write_geometry(&mut buf, geometry);
    buf.to_vec()
}

fn header(buf: &mut BytesMut, type_code: u32) {
    buf.put_u8(LITTLE_ENDIAN);
    buf.put_u32_le(type_code);
}

fn write_xy(buf: &mut BytesMut, points: &[[f64; 2]]) {
    buf.put_u32_le(points.len() as u32);
    for p in points {
        buf.put_f64_le(p[0]);
        buf.put_f64_le(p[1]);
    }
}

fn write_xyz(buf: &mut BytesMut, points: &[[f64; 3]]) {
    buf.put_u32_le(points.len() as u32);
    for p in points {
        buf.put_f64_le(p[0]);
        buf.put_f64_le(p[1]);
        buf.put_f64_le(p[2]);
    }
}

fn write_rings(buf: &mut BytesMut, rings: &[Vec<[f64; 2]>]) {
    buf.put_u32_le(rings.len() as u32);
    for ring in rings {
        write_xy(buf, ring);
    }
}

fn write_geometry(buf: &mut BytesMut, geometry: &Geometry) {
    match geometry {
        Geometry::Point(p) => {
            header(buf, WKB_POINT);
            buf.put_f64_le(p[0]);
            buf.put_f64_le(p[1]);
        }
        Geometry::LineString(pts) => {
            header(buf, WKB_LINESTRING);
            write_xy(buf, pts);
        }
        Geometry::LineStringZ(pts) => {
            header(buf, WKB_LINESTRING + Z_OFFSET);
            write_xyz(buf, pts);
        }
        Geometry::Polygon(rings) => {
            header(buf, WKB_POLYGON);
            write_rings(buf, rings);
        }
        Geometry::MultiPoint(pts) => {
            header(buf, WKB_MULTIPOINT);
            buf.put_u32_le(pts.len() as u32);
            for p in pts {
                write_geometry(buf, &Geometry::Point(*p));
            }
        }
        Geometry::MultiLineString(lines) => {
            header(buf, WKB_MULTILINESTRING);
            buf.put_u32_le(lines.len() as u32);
            for line in lines {
                header(buf, WKB_LINESTRING);
                write_xy(buf, line);
            }
        }
        Geometry::MultiLineStringZ(lines) => {
            header(buf, WKB_MULTILINESTRING + Z_OFFSET);
            buf.put_u32_le(lines.len() as u32);
            for line in lines {
                header(buf, WKB_LINESTRING + Z_OFFSET);
                write_xyz(buf, line);
            }
        }
        Geometry::MultiPolygon(polys) => {
            header(buf, WKB_MULTIPOLYGON);
            buf.put_u32_le(polys.len() as u32);
            for rings in polys {
                header(buf, WKB_POLYGON);
                write_rings(buf, rings);
            }
        }
    }
}

/// Decode WKB produced by [`encode`] or any 2-D/Z ISO or EWKB writer.
pub fn decode(data: &[u8]) -> RasResult<Geometry> {
    let mut reader = Reader { buf: data, little: true };
    let geometry = reader.geometry()?;
    if reader.buf.has_remaining() {
        return Err(wkb_error(format!("{} trailing bytes", reader.buf.remaining())));
    }
    Ok(geometry)
}

fn wkb_error(message: impl Into<String>) -> RasError {
    RasError::GeometryError(format!("invalid WKB: {}", message.into()))
}

struct Reader<'a> {
    buf: &'a [u8],
    little: bool,
}

impl Reader<'_> {
    fn need(&self, n: usize) -> RasResult<()> {
        if self.buf.remaining() < n {
            return Err(wkb_error("unexpected end of input"));
        }
        Ok(())
    }

    fn u32(&mut self) -> RasResult<u32> {
        self.need(4)?;
        Ok(if self.little {
            self.buf.get_u32_le()
        } else {
            self.buf.get_u32()
        })
    }

    fn f64(&mut self) -> RasResult<f64> {
        self.need(8)?;
        Ok(if self.little {
            self.buf.get_f64_le()
        } else {
            self.buf.get_f64()
        })
    }

    /// Byte order flag and type code; returns (base type, has_z).
    fn header(&mut self) -> RasResult<(u32, bool)> {
        self.need(1)?;
        self.little = match self.buf.get_u8() {
            0 => false,
            1 => true,
            other => return Err(wkb_error(format!("byte order {}", other))),
        };
        let code = self.u32()?;
        let ewkb_z = code & EWKB_Z_FLAG != 0;
        let code = code & !EWKB_Z_FLAG;
        let (base, iso_z) = match code {
            1..=7 => (code, false),
            1001..=1007 => (code - Z_OFFSET, true),
            other => return Err(wkb_error(format!("unsupported type code {}", other))),
        };
        Ok((base, ewkb_z || iso_z))
    }

    fn count(&mut self) -> RasResult<usize> {
        let n = self.u32()? as usize;
        // Every element takes at least 4 bytes
        if n > self.buf.remaining() / 4 {
            return Err(wkb_error(format!("count {} exceeds input", n)));
        }
        Ok(n)
    }

    fn xy(&mut self) -> RasResult<[f64; 2]> {
        Ok([self.f64()?, self.f64()?])
    }

    fn xyz(&mut self) -> RasResult<[f64; 3]> {
        Ok([self.f64()?, self.f64()?, self.f64()?])
    }

    fn xy_points(&mut self, has_z: bool) -> RasResult<Vec<[f64; 2]>> {
        let n = self.count()?;
        (0..n)
            .map(|_| {
                if has_z {
                    self.xyz().map(|p| [p[0], p[1]])
                } else {
                    self.xy()
                }
            })
            .collect()
    }

    fn xyz_points(&mut self) -> RasResult<Vec<[f64; 3]>> {
        let n = self.count()?;
        (0..n).map(|_| self.xyz()).collect()
    }

    fn rings(&mut self, has_z: bool) -> RasResult<Vec<Vec<[f64; 2]>>> {
        let n = self.count()?;
        (0..n).map(|_| self.xy_points(has_z)).collect()
    }

    fn expect_member(&mut self, expected: u32) -> RasResult<bool> {
        let (base, has_z) = self.header()?;
        if base != expected {
            return Err(wkb_error(format!("expected member type {}, found {}", expected, base)));
        }
        Ok(has_z)
    }

    fn geometry(&mut self) -> RasResult<Geometry> {
        let (base, has_z) = self.header()?;
        match base {
            WKB_POINT => {
                let p = if has_z { self.xyz().map(|p| [p[0], p[1]])? } else { self.xy()? };
                Ok(Geometry::Point(p))
            }
            WKB_LINESTRING if has_z => Ok(Geometry::LineStringZ(self.xyz_points()?)),
            WKB_LINESTRING => Ok(Geometry::LineString(self.xy_points(false)?)),
            WKB_POLYGON => Ok(Geometry::Polygon(self.rings(has_z)?)),
            WKB_MULTIPOINT => {
                let n = self.count()?;
                let mut points = Vec::with_capacity(n);
                for _ in 0..n {
                    let z = self.expect_member(WKB_POINT)?;
                    points.push(if z { self.xyz().map(|p| [p[0], p[1]])? } else { self.xy()? });
                }
                Ok(Geometry::MultiPoint(points))
            }
            WKB_MULTILINESTRING if has_z => {
                let n = self.count()?;
                let mut lines = Vec::with_capacity(n);
                for _ in 0..n {
                    self.expect_member(WKB_LINESTRING)?;
                    lines.push(self.xyz_points()?);
                }
                Ok(Geometry::MultiLineStringZ(lines))
            }
            WKB_MULTILINESTRING => {
                let n = self.count()?;
                let mut lines = Vec::with_capacity(n);
                for _ in 0..n {
                    let z = self.expect_member(WKB_LINESTRING)?;
                    lines.push(self.xy_points(z)?);
                }
                Ok(Geometry::MultiLineString(lines))
            }
            WKB_MULTIPOLYGON => {
                let n = self.count()?;
                let mut polys = Vec::with_capacity(n);
                for _ in 0..n {
                    let z = self.expect_member(WKB_POLYGON)?;
                    polys.push(self.rings(z)?);
                }
                Ok(Geometry::MultiPolygon(polys))
            }
            other => Err(wkb_error(format!("unsupported geometry type {}", other))),
        }
    }
}

/// Lowercase hex rendering used when WKB travels inside JSON.
pub fn to_hex(wkb: &[u8]) -> String {
    wkb.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Parse a hex string produced by [`to_hex`].
pub fn from_hex(hex: &str) -> RasResult<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return Err(wkb_error("odd-length hex string"));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| wkb_error(format!("bad hex at offset {}", i)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_layout() {
        let wkb = encode(&Geometry::Point([1.0, 2.0]));
        assert_eq!(wkb.len(), 21);
        assert_eq!(wkb[0], 1);
        assert_eq!(&wkb[1..5], &1u32.to_le_bytes());
        assert_eq!(&wkb[5..13], &1.0f64.to_le_bytes());
    }

    #[test]
    fn test_multilinestring_z_type_codes() {
        let wkb = encode(&Geometry::MultiLineStringZ(vec![vec![[0.0, 0.0, 1.0], [1.0, 1.0, 2.0]]]));
        assert_eq!(&wkb[1..5], &1005u32.to_le_bytes());
        // member header after byte order, type and count
        assert_eq!(&wkb[10..14], &1002u32.to_le_bytes());
        assert_eq!(wkb.len(), 1 + 4 + 4 + (1 + 4 + 4 + 2 * 24));
    }

    #[test]
    fn test_decode_multipolygon() {
        let geometry = Geometry::MultiPolygon(vec![vec![vec![
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 3.0],
            [0.0, 0.0],
        ]]]);
        assert_eq!(decode(&encode(&geometry)).unwrap(), geometry);
    }

    #[test]
    fn test_decode_big_endian_point() {
        let mut data = vec![0u8];
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&3.5f64.to_be_bytes());
        data.extend_from_slice(&(-1.0f64).to_be_bytes());
        assert_eq!(decode(&data).unwrap(), Geometry::Point([3.5, -1.0]));
    }

    #[test]
    fn test_decode_rejects_truncated() {
        let wkb = encode(&Geometry::LineString(vec![[0.0, 0.0], [1.0, 1.0]]));
        assert!(decode(&wkb[..wkb.len() - 1]).is_err());
        assert!(decode(&[]).is_err());
        assert!(decode(&[7, 1, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_hex() {
        assert_eq!(to_hex(&[0x01, 0xab, 0x00]), "01ab00");
        assert_eq!(from_hex("01ab00").unwrap(), vec![0x01, 0xab, 0x00]);
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
    }
}
