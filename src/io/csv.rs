use std::io::{self, Write};
use std::path::Path;

use crate::gnc::angle;
use crate::sim::record::SimulationRecord;

/// Write a simulation record in CSV format.
///
/// Columns: time, north, east, down, roll_deg, pitch_deg, yaw_deg,
///          u, v, w, p, q, r, n_left, n_right, tau_x, tau_n
pub fn write_record<W: Write>(writer: &mut W, record: &SimulationRecord) -> io::Result<()> {
    writeln!(
        writer,
        "time,north,east,down,roll_deg,pitch_deg,yaw_deg,\
         u,v,w,p,q,r,n_left,n_right,tau_x,tau_n"
    )?;

    for s in record {
        let st = &s.state;
        writeln!(
            writer,
            "{:.2},{:.4},{:.4},{:.4},{:.3},{:.3},{:.3},\
             {:.4},{:.4},{:.4},{:.5},{:.5},{:.5},{:.2},{:.2},{:.2},{:.3}",
            s.time,
            st.pos.x, st.pos.y, st.pos.z,
            st.attitude.x.to_degrees(),
            st.attitude.y.to_degrees(),
            angle::normalize(st.yaw().to_degrees()),
            st.vel.x, st.vel.y, st.vel.z,
            st.omega.x, st.omega.y, st.omega.z,
            st.prop_speed[0], st.prop_speed[1],
            s.command.surge_force,
            s.command.yaw_moment,
        )?;
    }

    Ok(())
}

/// Write a simulation record to a CSV file at the given path.
pub fn write_record_file(path: impl AsRef<Path>, record: &SimulationRecord) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_record(&mut file, record)?;
    file.flush()
}
